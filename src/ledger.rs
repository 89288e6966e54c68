use crate::parse::{ItemDraft, ReceiptParser};
use getset::{CopyGetters, Getters};
pub use rust_decimal::Decimal;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Representing a location, line number and column number, in a block of
/// recognized text.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl Location {
    pub fn advance(&self, width: usize) -> Self {
        Location {
            col: self.col + width,
            line: self.line,
        }
    }
}

impl From<(usize, usize)> for Location {
    fn from(tuple: (usize, usize)) -> Self {
        Location {
            line: tuple.0,
            col: tuple.1,
        }
    }
}

/// A string wrapped in [`Arc`](std::sync::Arc) labelling where a block of
/// recognized text came from, e.g. a file path or a scan label.
pub type SrcLabel = Arc<String>;

/// Represents a range in a block of recognized text. This struct is used to
/// track the origins of parsed line items, as well as for locating
/// diagnostics.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    pub label: SrcLabel,
    pub start: Location,
    pub end: Location,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.label, self.start.line, self.start.col)
    }
}

/// Kinds of diagnostics encountered while turning recognized text into bill
/// line items.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// IO error, e.g. the receipt text file cannot be read.
    Io,
    /// A line without a usable positive price.
    Price,
    /// A priced line without an item name.
    Name,
}

/// The level of a diagnostic. Lines resulting in an [`ErrorLevel::Info`]
/// entry are simply dropped from the parsed result.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

/// Contains the full information of a diagnostic.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Error {
    pub msg: String,
    pub src: Source,
    pub r#type: ErrorType,
    pub level: ErrorLevel,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: {}\n  {}:{}:{}",
            self.level, self.msg, self.src.label, self.src.start.line, self.src.start.col
        )
    }
}

/// A string wrapped in [`Arc`](std::sync::Arc) representing a participant
/// name. Names are unique within a ledger and shared between the roster and
/// the split sets of the items.
pub type Participant = Arc<String>;

/// Identifies one line item within a [`Ledger`]. Issued by the ledger when
/// the item is inserted; never reused.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One receipt entry: a name, a price, and the participants sharing its
/// cost.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct LineItem {
    /// Returns the item id.
    #[getset(get_copy = "pub")]
    pub(crate) id: ItemId,

    /// Returns the item name.
    #[getset(get = "pub")]
    pub(crate) name: String,

    /// Returns the item price.
    #[getset(get_copy = "pub")]
    pub(crate) price: Decimal,

    /// Returns the participants assigned to share this item, in assignment
    /// order.
    #[getset(get = "pub")]
    pub(crate) split_between: Vec<Participant>,

    /// Returns the origin of a parsed item; `None` for manual entries.
    #[getset(get = "pub")]
    pub(crate) src: Option<Source>,
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num_str = self.price.to_string();
        let width = f.width().unwrap_or(46);
        let name_width = std::cmp::max(
            self.name.chars().count() + 1,
            width.saturating_sub(num_str.len()),
        );
        write!(f, "{:width$}{}", self.name, num_str, width = name_width)?;
        if !self.split_between.is_empty() {
            let names: Vec<&str> = self.split_between.iter().map(|p| p.as_str()).collect();
            write!(f, "  [{}]", names.join(", "))?;
        }
        Ok(())
    }
}

/// Represents the per-participant totals derived from a [`Ledger`]. Every
/// roster participant has an entry, including those assigned to nothing.
pub type Totals = HashMap<Participant, Decimal>;

/// An in-memory bill: the participant roster plus the ordered line items
/// with their split assignments.
///
/// All state is volatile; a ledger lives for one page or one CLI run. No
/// operation panics or returns `Err` — invalid input is rejected by
/// omission and reported through the return value only.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters)]
pub struct Ledger {
    /// Returns the participant roster, in insertion order.
    #[getset(get = "pub")]
    pub(crate) participants: Vec<Participant>,

    /// Returns the line items, in insertion order.
    #[getset(get = "pub")]
    pub(crate) items: Vec<LineItem>,

    pub(crate) next_id: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger with the roster pre-seeded, e.g. from a project's
    /// member names. Blank and duplicate names are dropped.
    pub fn seeded<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ledger = Ledger::new();
        for name in names {
            ledger.add_participant(name.as_ref());
        }
        ledger
    }

    /// Parses a block of recognized receipt text and returns a ledger
    /// holding the accepted items (with an empty roster), plus the
    /// diagnostics for the discarded lines.
    pub fn from_scan(text: &str, label: &str) -> (Self, Vec<Error>) {
        let (drafts, errors) = ReceiptParser::parse(text, label);
        let mut ledger = Ledger::new();
        ledger.append_drafts(drafts, &[]);
        (ledger, errors)
    }

    /// Reads receipt text from `path` and parses it. An unreadable file
    /// yields an empty ledger and a single [`ErrorType::Io`] diagnostic.
    pub fn from_file(path: &str) -> (Self, Vec<Error>) {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_scan(&text, path),
            Err(err) => {
                let error = Error {
                    msg: format!("Cannot read {}: {}.", path, err),
                    src: Source {
                        label: Arc::new(path.to_string()),
                        start: Location::default(),
                        end: Location::default(),
                    },
                    r#type: ErrorType::Io,
                    level: ErrorLevel::Error,
                };
                (Ledger::new(), vec![error])
            }
        }
    }

    /// Adds `name` to the roster if non-empty after trimming and not
    /// already present (case-sensitive). Returns whether the roster
    /// changed.
    pub fn add_participant(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.find_participant(name).is_some() {
            return false;
        }
        self.participants.push(Arc::new(name.to_string()));
        true
    }

    /// Removes `name` from the roster and strips it from every item's
    /// split set, so no item keeps a reference to a participant that is
    /// gone. Returns whether the roster changed.
    pub fn remove_participant(&mut self, name: &str) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.as_str() != name);
        if self.participants.len() == before {
            return false;
        }
        for item in &mut self.items {
            item.split_between.retain(|p| p.as_str() != name);
        }
        true
    }

    /// Appends a manually entered item. Requires a non-empty trimmed name
    /// and a positive price; names in `split` that are not on the roster
    /// are dropped. Returns the id of the new item, or `None` if nothing
    /// was added.
    pub fn add_item(&mut self, name: &str, price: Decimal, split: &[&str]) -> Option<ItemId> {
        self.push_item(name, price, split, None)
    }

    /// Turns parser drafts into items, assigning each the default split
    /// (`split_with` filtered to the roster). Every draft is re-validated;
    /// rejected drafts are skipped. Returns the ids of the items added.
    pub fn append_drafts(&mut self, drafts: Vec<ItemDraft>, split_with: &[&str]) -> Vec<ItemId> {
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let ItemDraft { name, price, src } = draft;
            if let Some(id) = self.push_item(&name, price, split_with, Some(src)) {
                ids.push(id);
            }
        }
        ids
    }

    /// Removes the item with the matching id. No-op if not found.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// For the item matching `id`, removes `name` from its split set if
    /// present, otherwise adds it. Only roster members can be assigned;
    /// no-op if the item or the participant is unknown.
    pub fn toggle_split(&mut self, id: ItemId, name: &str) -> bool {
        let participant = match self.find_participant(name) {
            Some(p) => p.clone(),
            None => return false,
        };
        let item = match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => item,
            None => return false,
        };
        match item.split_between.iter().position(|p| p.as_str() == name) {
            Some(pos) => {
                item.split_between.remove(pos);
            }
            None => item.split_between.push(participant),
        }
        true
    }

    /// Returns the item with the matching id, if any.
    pub fn item(&self, id: ItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Recomputes the per-participant totals from scratch. Every roster
    /// participant starts at zero; each item with a non-empty split set
    /// contributes `price / k` to each of its `k` assignees; items with an
    /// empty split set contribute nothing.
    pub fn totals(&self) -> Totals {
        let mut totals: Totals = self
            .participants
            .iter()
            .map(|p| (p.clone(), Decimal::ZERO))
            .collect();
        for item in &self.items {
            if item.split_between.is_empty() {
                continue;
            }
            let share = item.price / Decimal::from(item.split_between.len());
            for participant in &item.split_between {
                *totals.entry(participant.clone()).or_insert(Decimal::ZERO) += share;
            }
        }
        totals
    }

    fn find_participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.as_str() == name)
    }

    fn push_item(
        &mut self,
        name: &str,
        price: Decimal,
        split: &[&str],
        src: Option<Source>,
    ) -> Option<ItemId> {
        let name = name.trim();
        if name.is_empty() || price <= Decimal::ZERO {
            return None;
        }
        let mut split_between: Vec<Participant> = Vec::new();
        for assignee in split {
            if split_between.iter().any(|p| p.as_str() == *assignee) {
                continue;
            }
            if let Some(participant) = self.find_participant(assignee) {
                split_between.push(participant.clone());
            }
        }
        self.next_id += 1;
        let id = ItemId(self.next_id);
        self.items.push(LineItem {
            id,
            name: name.to_string(),
            price,
            split_between,
            src,
        });
        Some(id)
    }
}
