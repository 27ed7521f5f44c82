use serde::Serialize;

/// A project as listed on the projects page.
///
/// `favorite` is the string `"true"` or `"false"`; the page and the
/// browser scripts compare against the string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Project {
	pub name: &'static str,
	pub last_edited: &'static str,
	pub favorite: &'static str,
}

impl Project {
	pub fn is_favorite(&self) -> bool {
		self.favorite == "true"
	}
}

pub const PROJECTS: [Project; 5] = [
	Project {
		name: "Project A",
		last_edited: "15.11.2024",
		favorite: "true",
	},
	Project {
		name: "Project B",
		last_edited: "15.11.2024",
		favorite: "false",
	},
	Project {
		name: "Project C",
		last_edited: "15.11.2024",
		favorite: "true",
	},
	Project {
		name: "Project D",
		last_edited: "15.11.2024",
		favorite: "true",
	},
	Project {
		name: "Project E",
		last_edited: "15.11.2024",
		favorite: "false",
	},
];
