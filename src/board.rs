//! Kanban ticket board for project tasks.
//!
//! Three ordered columns; tickets move between them by index, mirroring
//! drag-and-drop in the interaction layer. The board also derives the
//! completion summary shown above the columns and the calendar CSV export.

use chrono::NaiveDate;
use getset::{CopyGetters, Getters};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket priority.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "LOW"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::High => write!(f, "HIGH"),
        }
    }
}

/// The column a ticket sits in.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Todo,
    InProgress,
    Done,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Todo, Column::InProgress, Column::Done];
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Todo => write!(f, "todo"),
            Column::InProgress => write!(f, "in-progress"),
            Column::Done => write!(f, "done"),
        }
    }
}

/// Identifies one ticket within a [`TicketBoard`]. Issued by the board when
/// the ticket is created; never reused.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TicketId(u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ticket-{}", self.0)
    }
}

/// One task on the board.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Ticket {
    /// Returns the ticket id.
    #[getset(get_copy = "pub")]
    pub(crate) id: TicketId,

    /// Returns the ticket title.
    #[getset(get = "pub")]
    pub(crate) title: String,

    /// Returns the ticket description.
    #[getset(get = "pub")]
    pub(crate) description: String,

    /// Returns the due date.
    #[getset(get_copy = "pub")]
    pub(crate) date: NaiveDate,

    /// Returns the priority.
    #[getset(get_copy = "pub")]
    pub(crate) priority: Priority,
}

/// The completion summary of a board.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    /// `completed / total`, rounded to a whole percentage; 0 for an empty
    /// board.
    pub percentage: u32,
}

/// The kanban board: `todo`, `in-progress`, and `done` columns of ordered
/// tickets.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketBoard {
    todo: Vec<Ticket>,
    in_progress: Vec<Ticket>,
    done: Vec<Ticket>,
    next_id: u64,
}

impl TicketBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ticket at the end of the `todo` column. Requires a
    /// non-empty trimmed title; returns the id of the new ticket, or `None`
    /// if nothing was added.
    pub fn create(
        &mut self,
        title: &str,
        description: &str,
        date: NaiveDate,
        priority: Priority,
    ) -> Option<TicketId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        self.next_id += 1;
        let id = TicketId(self.next_id);
        self.todo.push(Ticket {
            id,
            title: title.to_string(),
            description: description.to_string(),
            date,
            priority,
        });
        Some(id)
    }

    /// Returns the tickets of `column`, in board order.
    pub fn column(&self, column: Column) -> &[Ticket] {
        match column {
            Column::Todo => &self.todo,
            Column::InProgress => &self.in_progress,
            Column::Done => &self.done,
        }
    }

    /// Moves the ticket at `from_index` of column `from` to position
    /// `to_index` of column `to` — a reorder when the columns are equal.
    /// Out-of-range indices are a no-op.
    pub fn move_ticket(
        &mut self,
        from: Column,
        from_index: usize,
        to: Column,
        to_index: usize,
    ) -> bool {
        if from == to {
            let column = self.column_mut(from);
            if from_index >= column.len() || to_index >= column.len() {
                return false;
            }
            let ticket = column.remove(from_index);
            column.insert(to_index, ticket);
            return true;
        }
        if from_index >= self.column(from).len() || to_index > self.column(to).len() {
            return false;
        }
        let ticket = self.column_mut(from).remove(from_index);
        self.column_mut(to).insert(to_index, ticket);
        true
    }

    /// Removes the ticket with the matching id from whichever column holds
    /// it. No-op if not found.
    pub fn remove(&mut self, id: TicketId) -> bool {
        let before = self.len();
        for column in Column::ALL {
            self.column_mut(column).retain(|ticket| ticket.id != id);
        }
        self.len() != before
    }

    /// Iterates all tickets, column by column in `todo`, `in-progress`,
    /// `done` order.
    pub fn tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.todo
            .iter()
            .chain(self.in_progress.iter())
            .chain(self.done.iter())
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the completion summary.
    pub fn progress(&self) -> Progress {
        let total = self.len();
        let completed = self.done.len();
        let percentage = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u32
        };
        Progress {
            total,
            completed,
            percentage,
        }
    }

    /// Renders the board as `Title,Description,Status,Date` CSV rows, dates
    /// as `YYYY-MM-DD`. String building only; writing it anywhere is the
    /// caller's business.
    pub fn to_csv(&self) -> String {
        let mut rows = vec!["Title,Description,Status,Date".to_string()];
        for column in Column::ALL {
            for ticket in self.column(column) {
                rows.push(format!(
                    "{},{},{},{}",
                    ticket.title, ticket.description, column, ticket.date
                ));
            }
        }
        rows.join("\n")
    }

    fn column_mut(&mut self, column: Column) -> &mut Vec<Ticket> {
        match column {
            Column::Todo => &mut self.todo,
            Column::InProgress => &mut self.in_progress,
            Column::Done => &mut self.done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn board_with(titles: &[&str]) -> TicketBoard {
        let mut board = TicketBoard::new();
        for title in titles {
            board.create(title, "desc", date("2025-03-01"), Priority::Low);
        }
        board
    }

    #[test]
    fn create_requires_a_title() {
        let mut board = TicketBoard::new();
        assert_eq!(board.create("  ", "desc", date("2025-03-01"), Priority::Low), None);
        assert!(board.is_empty());
        let id = board.create("Write intro", "", date("2025-03-01"), Priority::High);
        assert!(id.is_some());
        assert_eq!(board.column(Column::Todo).len(), 1);
    }

    #[test]
    fn reorder_within_a_column() {
        let mut board = board_with(&["a", "b", "c"]);
        assert!(board.move_ticket(Column::Todo, 0, Column::Todo, 2));
        let titles: Vec<&str> = board
            .column(Column::Todo)
            .iter()
            .map(|t| t.title().as_str())
            .collect();
        assert_eq!(titles, ["b", "c", "a"]);
    }

    #[test]
    fn move_across_columns_at_a_position() {
        let mut board = board_with(&["a", "b"]);
        assert!(board.move_ticket(Column::Todo, 1, Column::InProgress, 0));
        assert!(board.move_ticket(Column::InProgress, 0, Column::Done, 0));
        assert_eq!(board.column(Column::Todo).len(), 1);
        assert_eq!(board.column(Column::Done).len(), 1);
        assert_eq!(board.column(Column::Done)[0].title(), "b");
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn out_of_range_moves_are_rejected() {
        let mut board = board_with(&["a"]);
        assert!(!board.move_ticket(Column::Todo, 5, Column::Done, 0));
        assert!(!board.move_ticket(Column::Todo, 0, Column::Done, 3));
        assert!(!board.move_ticket(Column::Done, 0, Column::Todo, 0));
        assert_eq!(board.column(Column::Todo).len(), 1);
    }

    #[test]
    fn remove_finds_the_ticket_in_any_column() {
        let mut board = board_with(&["a", "b"]);
        let id = board.column(Column::Todo)[1].id();
        board.move_ticket(Column::Todo, 1, Column::Done, 0);
        assert!(board.remove(id));
        assert!(!board.remove(id));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn progress_rounds_the_percentage() {
        let mut board = board_with(&["a", "b", "c"]);
        board.move_ticket(Column::Todo, 0, Column::Done, 0);
        let progress = board.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.percentage, 33);
        board.move_ticket(Column::Todo, 0, Column::Done, 0);
        assert_eq!(board.progress().percentage, 67);
    }

    #[test]
    fn progress_of_an_empty_board_is_zero() {
        let board = TicketBoard::new();
        assert_eq!(board.progress(), Progress::default());
    }

    #[test]
    fn csv_lists_all_columns_with_status() {
        let mut board = board_with(&["a", "b"]);
        board.move_ticket(Column::Todo, 1, Column::Done, 0);
        let csv = board.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Title,Description,Status,Date");
        assert_eq!(lines[1], "a,desc,todo,2025-03-01");
        assert_eq!(lines[2], "b,desc,done,2025-03-01");
    }
}
