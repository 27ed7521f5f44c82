use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;

/// Fans a shutdown request out to the accept loop and every connection.
///
/// # Examples
///
/// ```
/// use canvas::server::ShutdownCoordinator;
/// use std::time::Duration;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
/// let waiter = coordinator.clone();
///
/// coordinator.shutdown();
/// waiter.wait().await;
/// assert!(waiter.is_shutting_down());
/// # });
/// ```
#[derive(Clone)]
pub struct ShutdownCoordinator {
	sender: broadcast::Sender<()>,
	triggered: Arc<AtomicBool>,
	timeout: Duration,
}

impl ShutdownCoordinator {
	/// `timeout` bounds how long in-flight connections may keep running.
	pub fn new(timeout: Duration) -> Self {
		let (sender, _) = broadcast::channel(1);
		Self {
			sender,
			triggered: Arc::new(AtomicBool::new(false)),
			timeout,
		}
	}

	pub fn subscribe(&self) -> broadcast::Receiver<()> {
		self.sender.subscribe()
	}

	/// Begin shutting down. Later calls do nothing.
	pub fn shutdown(&self) {
		if !self.triggered.swap(true, Ordering::SeqCst) {
			tracing::info!("shutdown requested");
			// No receivers just means nothing is running yet
			let _ = self.sender.send(());
		}
	}

	pub fn is_shutting_down(&self) -> bool {
		self.triggered.load(Ordering::SeqCst)
	}

	/// Resolve once [`shutdown`](Self::shutdown) has been called, even if
	/// that happened before this call.
	pub async fn wait(&self) {
		let mut receiver = self.subscribe();
		if self.is_shutting_down() {
			return;
		}
		let _ = receiver.recv().await;
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(error) = tokio::signal::ctrl_c().await {
			tracing::error!(%error, "failed to listen for Ctrl-C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		use tokio::signal::unix::{SignalKind, signal};
		match signal(SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(error) => {
				tracing::error!(%error, "failed to listen for SIGTERM");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => tracing::info!("received Ctrl-C"),
		_ = terminate => tracing::info!("received SIGTERM"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[tokio::test]
	async fn test_subscribers_are_notified() {
		let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
		let mut receiver = coordinator.subscribe();

		coordinator.shutdown();

		assert!(receiver.recv().await.is_ok());
	}

	#[rstest]
	#[tokio::test]
	async fn test_wait_after_shutdown_returns() {
		let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
		coordinator.shutdown();
		coordinator.shutdown();

		tokio::time::timeout(Duration::from_secs(1), coordinator.wait())
			.await
			.unwrap();
	}

	#[rstest]
	fn test_not_shutting_down_initially() {
		let coordinator = ShutdownCoordinator::new(Duration::from_secs(30));

		assert!(!coordinator.is_shutting_down());
		assert_eq!(coordinator.timeout(), Duration::from_secs(30));
	}
}
