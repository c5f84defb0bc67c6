//! Typed partial updates for task items.
//!
//! Callers send RFC 6902 JSON Patch documents. Instead of applying them to a
//! JSON rendering of the record, each operation is resolved against a closed
//! set of field paths and compiled into a [`TaskItemEdit`]. Resolution happens
//! for the whole document before anything is applied, so a document is either
//! accepted entirely or rejected without touching the record.
//!
//! Field paths are matched case-sensitively and each field accepts exactly two
//! spellings: PascalCase, which is what the existing web client sends
//! (`/Status`), and the camelCase wire name (`/status`).

use chrono::{DateTime, FixedOffset};
use db::models::task_item::TaskItem;
use json_patch::{Patch, PatchOperation};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("Invalid patch document: {0}")]
    Malformed(String),
    #[error("Unsupported patch operation '{op}' at '{path}'")]
    UnsupportedOperation { op: &'static str, path: String },
    #[error("Unknown patch path '{0}'")]
    UnknownPath(String),
    #[error("Field at '{0}' cannot be modified")]
    Immutable(String),
    #[error("Field at '{0}' is required and cannot be removed")]
    Required(String),
    #[error("Invalid value for '{path}': expected {expected}")]
    InvalidValue {
        path: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskItemField {
    Id,
    Title,
    Description,
    Status,
    AssignedUser,
    CreatedDate,
}

impl TaskItemField {
    pub fn from_path(path: &str) -> Option<Self> {
        let field = match path {
            "/Id" | "/id" => Self::Id,
            "/Title" | "/title" => Self::Title,
            "/Description" | "/description" => Self::Description,
            "/Status" | "/status" => Self::Status,
            "/AssignedUser" | "/assignedUser" => Self::AssignedUser,
            "/CreatedDate" | "/createdDate" => Self::CreatedDate,
            _ => return None,
        };
        Some(field)
    }
}

/// A single validated field assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskItemEdit {
    SetTitle(String),
    SetDescription(Option<String>),
    SetStatus(String),
    SetAssignedUser(String),
    SetCreatedDate(DateTime<FixedOffset>),
}

impl TaskItemEdit {
    pub fn field(&self) -> TaskItemField {
        match self {
            Self::SetTitle(_) => TaskItemField::Title,
            Self::SetDescription(_) => TaskItemField::Description,
            Self::SetStatus(_) => TaskItemField::Status,
            Self::SetAssignedUser(_) => TaskItemField::AssignedUser,
            Self::SetCreatedDate(_) => TaskItemField::CreatedDate,
        }
    }

    fn apply_to(&self, task: &mut TaskItem) {
        match self {
            Self::SetTitle(title) => task.title = title.clone(),
            Self::SetDescription(description) => task.description = description.clone(),
            Self::SetStatus(status) => task.status = status.clone(),
            Self::SetAssignedUser(user) => task.assigned_user = user.clone(),
            Self::SetCreatedDate(date) => task.created_date = *date,
        }
    }
}

/// An ordered, fully validated patch for one task item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskItemPatch {
    edits: Vec<TaskItemEdit>,
}

impl TaskItemPatch {
    /// Parses a request body. `null` counts as a missing document.
    pub fn from_value(value: Value) -> Result<Self, PatchError> {
        if value.is_null() {
            return Err(PatchError::Malformed("patch document is missing".to_string()));
        }
        let patch: Patch =
            serde_json::from_value(value).map_err(|err| PatchError::Malformed(err.to_string()))?;
        Self::try_from(&patch)
    }

    pub fn edits(&self) -> &[TaskItemEdit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Applies every edit in document order.
    pub fn apply_to(&self, task: &mut TaskItem) {
        for edit in &self.edits {
            edit.apply_to(task);
        }
    }

    fn compile(operation: &PatchOperation) -> Result<TaskItemEdit, PatchError> {
        match operation {
            // On an object member `add` replaces an existing value (RFC 6902 4.1).
            PatchOperation::Add(op) => set_field(&op.path.to_string(), &op.value),
            PatchOperation::Replace(op) => set_field(&op.path.to_string(), &op.value),
            PatchOperation::Remove(op) => remove_field(&op.path.to_string()),
            PatchOperation::Move(op) => Err(PatchError::UnsupportedOperation {
                op: "move",
                path: op.path.to_string(),
            }),
            PatchOperation::Copy(op) => Err(PatchError::UnsupportedOperation {
                op: "copy",
                path: op.path.to_string(),
            }),
            PatchOperation::Test(op) => Err(PatchError::UnsupportedOperation {
                op: "test",
                path: op.path.to_string(),
            }),
        }
    }
}

impl TryFrom<&Patch> for TaskItemPatch {
    type Error = PatchError;

    fn try_from(patch: &Patch) -> Result<Self, Self::Error> {
        let edits = patch
            .0
            .iter()
            .map(Self::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { edits })
    }
}

fn resolve(path: &str) -> Result<TaskItemField, PatchError> {
    TaskItemField::from_path(path).ok_or_else(|| PatchError::UnknownPath(path.to_string()))
}

fn set_field(path: &str, value: &Value) -> Result<TaskItemEdit, PatchError> {
    let edit = match resolve(path)? {
        TaskItemField::Id => return Err(PatchError::Immutable(path.to_string())),
        TaskItemField::Title => TaskItemEdit::SetTitle(expect_string(path, value)?),
        TaskItemField::Description => match value {
            Value::Null => TaskItemEdit::SetDescription(None),
            Value::String(description) => TaskItemEdit::SetDescription(Some(description.clone())),
            _ => {
                return Err(PatchError::InvalidValue {
                    path: path.to_string(),
                    expected: "a string or null",
                });
            }
        },
        TaskItemField::Status => TaskItemEdit::SetStatus(expect_string(path, value)?),
        TaskItemField::AssignedUser => TaskItemEdit::SetAssignedUser(expect_string(path, value)?),
        TaskItemField::CreatedDate => {
            let raw = expect_string(path, value)?;
            let date = DateTime::parse_from_rfc3339(&raw).map_err(|_| PatchError::InvalidValue {
                path: path.to_string(),
                expected: "an RFC 3339 timestamp",
            })?;
            TaskItemEdit::SetCreatedDate(date)
        }
    };
    Ok(edit)
}

fn remove_field(path: &str) -> Result<TaskItemEdit, PatchError> {
    match resolve(path)? {
        TaskItemField::Id => Err(PatchError::Immutable(path.to_string())),
        TaskItemField::Description => Ok(TaskItemEdit::SetDescription(None)),
        TaskItemField::Title
        | TaskItemField::Status
        | TaskItemField::AssignedUser
        | TaskItemField::CreatedDate => Err(PatchError::Required(path.to_string())),
    }
}

fn expect_string(path: &str, value: &Value) -> Result<String, PatchError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PatchError::InvalidValue {
            path: path.to_string(),
            expected: "a string",
        })
}
