use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Function,
}

/// A model-issued request to call a named capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionInvocation {
    pub name: String,
    pub arguments: serde_json::Value,
}

impl FunctionInvocation {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// One message in the conversation log.
///
/// Assistant turns carry either `content` or a `function_call`, never both
/// meaningfully; function-result turns always carry `function_name` plus the
/// serialized result in `content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default = "generate_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionInvocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            role: Role::System,
            content: content.into(),
            function_call: None,
            function_name: None,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            role: Role::User,
            content: content.into(),
            function_call: None,
            function_name: None,
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            role: Role::Assistant,
            content: content.into(),
            function_call: None,
            function_name: None,
            created_at: Utc::now(),
        }
    }

    /// Assistant turn that requests a capability instead of answering.
    pub fn assistant_call(call: FunctionInvocation) -> Self {
        Self {
            id: generate_id(),
            role: Role::Assistant,
            content: String::new(),
            function_call: Some(call),
            function_name: None,
            created_at: Utc::now(),
        }
    }

    pub fn function_result(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            role: Role::Function,
            content: content.into(),
            function_call: None,
            function_name: Some(name.into()),
            created_at: Utc::now(),
        }
    }

    pub fn is_function_call(&self) -> bool {
        self.function_call.is_some()
    }
}
