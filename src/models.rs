//! Frontend Models
//!
//! Data structures matching backend entities, plus the request bodies the
//! stores send.

use serde::{Deserialize, Serialize};

use crate::identity::WireTodo;

/// Backend identifier
pub type Id = u64;

/// Anything kept in a collection store, addressed by its identifier
pub trait Identified {
    fn id(&self) -> Id;
}

// ========================
// Todos
// ========================

/// Todo data structure (matches backend, identity normalized on decode)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireTodo")]
pub struct Todo {
    pub id: Id,
    pub title: String,
    pub completed: bool,
}

impl Identified for Todo {
    fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TodoDraft<'a> {
    pub title: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoPatch {
    pub title: String,
    pub completed: bool,
}

// ========================
// Transactions & Categories
// ========================

/// Income/expense split shared by transactions and categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            EntryKind::Income => EntryKind::Expense,
            EntryKind::Expense => EntryKind::Income,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Id,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: f64,
    pub category_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Identified for Transaction {
    fn id(&self) -> Id {
        self.id
    }
}

/// Body for creating or updating a transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionInput {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: f64,
    pub category_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Backend-computed transaction totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub expense: f64,
    #[serde(default)]
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl Identified for Category {
    fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

// ========================
// Debts
// ========================

/// Owed: someone owes the user. Owing: the user owes someone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtKind {
    Owed,
    Owing,
}

impl DebtKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtKind::Owed => "owed",
            DebtKind::Owing => "owing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: Id,
    #[serde(rename = "type")]
    pub kind: DebtKind,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Payments in the order the backend recorded them
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl Identified for Debt {
    fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtInput {
    #[serde(rename = "type")]
    pub kind: DebtKind,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Backend-computed debt totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtSummary {
    #[serde(default)]
    pub owed: f64,
    #[serde(default)]
    pub owing: f64,
    #[serde(default)]
    pub balance: f64,
}

// ========================
// Auth
// ========================

#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
