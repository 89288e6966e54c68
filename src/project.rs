//! Projects, group sessions, and the views derived from them.
//!
//! A project holds enrolled members and the group sessions captured over
//! its lifetime. Who actually appears in a session photo is decided by the
//! external face-recognition collaborator; this module only stores the
//! recognized names and derives the attendance leaderboard and the
//! collaboration graph from them.

use chrono::{DateTime, Utc};
use getset::{CopyGetters, Getters};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// An enrolled project member.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    /// URL or path of the enrollment photo.
    pub photo: String,
}

/// One captured group session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Names recognized in the session photo.
    pub participants: Vec<String>,
    pub photo: String,
    pub caption: String,
    pub timestamp: DateTime<Utc>,
}

/// One attendance leaderboard row.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub name: String,
    pub count: usize,
    /// The member's enrollment photo, when the name belongs to a member.
    pub photo: Option<String>,
}

/// A node of the collaboration graph.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
}

/// An edge of the collaboration graph. `value` is the fraction of sessions
/// in which the two participants appeared together, between 0 and 1.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

/// The collaboration graph of a project, in sorted name order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollabGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// A group project: enrolled members plus the sessions captured so far.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Project {
    /// Returns the project name.
    #[getset(get = "pub")]
    pub(crate) name: String,

    /// Returns the free-form project details.
    #[getset(get = "pub")]
    pub(crate) details: String,

    /// Returns the creation time.
    #[getset(get_copy = "pub")]
    pub(crate) created_at: DateTime<Utc>,

    /// Returns the enrolled members.
    #[getset(get = "pub")]
    pub(crate) members: Vec<Member>,

    /// Returns the captured sessions, in capture order.
    #[getset(get = "pub")]
    pub(crate) sessions: Vec<Session>,
}

impl Project {
    pub fn new(name: &str, members: Vec<Member>) -> Self {
        Project {
            name: name.to_string(),
            details: String::new(),
            created_at: Utc::now(),
            members,
            sessions: Vec::new(),
        }
    }

    pub fn set_details(&mut self, details: &str) {
        self.details = details.to_string();
    }

    /// Records a group session. `participants` are the names recognized in
    /// the photo by the external collaborator.
    pub fn capture_session(
        &mut self,
        participants: Vec<String>,
        photo: String,
        caption: String,
    ) -> &Session {
        self.sessions.push(Session {
            participants,
            photo,
            caption,
            timestamp: Utc::now(),
        });
        // just pushed, so the list is non-empty
        &self.sessions[self.sessions.len() - 1]
    }

    /// Counts each name's appearances across all sessions and attaches the
    /// enrollment photo where the name belongs to a member. Rows are sorted
    /// by count descending; ties keep first-appearance order.
    pub fn leaderboard(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = Vec::new();
        for session in &self.sessions {
            for name in &session.participants {
                match standings.iter_mut().find(|s| &s.name == name) {
                    Some(standing) => standing.count += 1,
                    None => standings.push(Standing {
                        name: name.clone(),
                        count: 1,
                        photo: None,
                    }),
                }
            }
        }
        for standing in &mut standings {
            if let Some(member) = self.members.iter().find(|m| m.name == standing.name) {
                standing.photo = Some(member.photo.clone());
            }
        }
        standings.sort_by(|a, b| b.count.cmp(&a.count));
        standings
    }

    /// Builds the collaboration graph: one node per name ever recognized in
    /// a session, one link per unordered pair that appeared together, with
    /// the co-appearance count normalized by the total session count.
    pub fn collab_graph(&self) -> CollabGraph {
        let total = self.sessions.len();
        if total == 0 {
            return CollabGraph::default();
        }
        let mut names: BTreeSet<&String> = BTreeSet::new();
        let mut pairs: BTreeMap<(&String, &String), usize> = BTreeMap::new();
        for session in &self.sessions {
            let unique: BTreeSet<&String> = session.participants.iter().collect();
            let sorted: Vec<&String> = unique.into_iter().collect();
            names.extend(sorted.iter().copied());
            for (i, source) in sorted.iter().enumerate() {
                for target in &sorted[i + 1..] {
                    *pairs.entry((*source, *target)).or_insert(0) += 1;
                }
            }
        }
        CollabGraph {
            nodes: names
                .into_iter()
                .map(|name| GraphNode { id: name.clone() })
                .collect(),
            links: pairs
                .into_iter()
                .map(|((source, target), count)| GraphLink {
                    source: source.clone(),
                    target: target.clone(),
                    value: count as f64 / total as f64,
                })
                .collect(),
        }
    }
}

/// The projects known to this app instance, keyed by name. Mirrors the
/// backend's project collection; persistence itself stays with the backend
/// collaborator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectBook {
    projects: BTreeMap<String, Project>,
}

impl ProjectBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a project, replacing any existing project with the same
    /// name.
    pub fn create(&mut self, name: &str, members: Vec<Member>) -> &mut Project {
        let project = Project::new(name, members);
        match self.projects.entry(name.to_string()) {
            Entry::Vacant(entry) => entry.insert(project),
            Entry::Occupied(mut entry) => {
                entry.insert(project);
                entry.into_mut()
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Project> {
        self.projects.get_mut(name)
    }

    /// Updates the free-form details of a project. Returns whether the
    /// project exists.
    pub fn update_details(&mut self, name: &str, details: &str) -> bool {
        match self.projects.get_mut(name) {
            Some(project) => {
                project.set_details(details);
                true
            }
            None => false,
        }
    }

    /// Iterates projects in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> Member {
        Member {
            name: name.to_string(),
            photo: format!("photos/{}.jpg", name),
        }
    }

    fn session(project: &mut Project, names: &[&str]) {
        project.capture_session(
            names.iter().map(|n| n.to_string()).collect(),
            "data:image/jpeg;base64,...".to_string(),
            "standup".to_string(),
        );
    }

    #[test]
    fn create_replaces_existing_project() {
        let mut book = ProjectBook::new();
        book.create("thesis", vec![member("Alice")]);
        session(book.get_mut("thesis").unwrap(), &["Alice"]);
        let replaced = book.create("thesis", vec![member("Bob")]);
        assert!(replaced.sessions().is_empty());
        assert_eq!(book.len(), 1);
        assert_eq!(book.get("thesis").unwrap().members()[0].name, "Bob");
    }

    #[test]
    fn update_details_requires_an_existing_project() {
        let mut book = ProjectBook::new();
        book.create("thesis", vec![]);
        assert!(book.update_details("thesis", "weekly sync at 10"));
        assert!(!book.update_details("missing", "whatever"));
        assert_eq!(book.get("thesis").unwrap().details(), "weekly sync at 10");
    }

    #[test]
    fn iter_is_name_ordered() {
        let mut book = ProjectBook::new();
        book.create("zeta", vec![]);
        book.create("alpha", vec![]);
        let names: Vec<&str> = book.iter().map(|p| p.name().as_str()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }

    #[test]
    fn leaderboard_counts_and_sorts_descending() {
        let mut project = Project::new("thesis", vec![member("Alice"), member("Bob")]);
        session(&mut project, &["Alice", "Bob"]);
        session(&mut project, &["Alice"]);
        session(&mut project, &["Alice", "Carol"]);
        let board = project.leaderboard();
        assert_eq!(board.len(), 3);
        assert_eq!(board[0].name, "Alice");
        assert_eq!(board[0].count, 3);
        assert_eq!(board[1].count, 1);
    }

    #[test]
    fn leaderboard_attaches_member_photos() {
        let mut project = Project::new("thesis", vec![member("Alice")]);
        session(&mut project, &["Alice", "Visitor"]);
        let board = project.leaderboard();
        let alice = board.iter().find(|s| s.name == "Alice").unwrap();
        assert_eq!(alice.photo.as_deref(), Some("photos/Alice.jpg"));
        let visitor = board.iter().find(|s| s.name == "Visitor").unwrap();
        assert_eq!(visitor.photo, None);
    }

    #[test]
    fn leaderboard_ties_keep_first_appearance_order() {
        let mut project = Project::new("thesis", vec![]);
        session(&mut project, &["Bob", "Alice"]);
        let board = project.leaderboard();
        assert_eq!(board[0].name, "Bob");
        assert_eq!(board[1].name, "Alice");
    }

    #[test]
    fn collab_value_is_pair_count_over_session_count() {
        let mut project = Project::new("thesis", vec![]);
        session(&mut project, &["Alice", "Bob"]);
        session(&mut project, &["Alice", "Bob", "Carol"]);
        session(&mut project, &["Alice"]);
        session(&mut project, &["Bob"]);
        let graph = project.collab_graph();
        assert_eq!(graph.nodes.len(), 3);
        let ab = graph
            .links
            .iter()
            .find(|l| l.source == "Alice" && l.target == "Bob")
            .unwrap();
        assert_eq!(ab.value, 2.0 / 4.0);
        let bc = graph
            .links
            .iter()
            .find(|l| l.source == "Bob" && l.target == "Carol")
            .unwrap();
        assert_eq!(bc.value, 1.0 / 4.0);
    }

    #[test]
    fn collab_graph_of_no_sessions_is_empty() {
        let project = Project::new("thesis", vec![member("Alice")]);
        let graph = project.collab_graph();
        assert!(graph.nodes.is_empty());
        assert!(graph.links.is_empty());
    }

    #[test]
    fn duplicate_names_in_a_session_count_once_per_pair() {
        let mut project = Project::new("thesis", vec![]);
        session(&mut project, &["Alice", "Alice", "Bob"]);
        let graph = project.collab_graph();
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].value, 1.0);
    }
}
