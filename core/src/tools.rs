//! Tool discovery metadata for a host tool-calling framework.

use serde::Serialize;
use serde_json::Value;

use crate::operations::Operation;

/// Serializable listing entry for one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub input_schema: Value,
}

impl From<Operation> for ToolInfo {
    fn from(operation: Operation) -> Self {
        let descriptor = operation.descriptor();
        Self {
            name: descriptor.name,
            description: descriptor.description,
            tags: descriptor.tags,
            input_schema: descriptor.input_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tool_info_serializes_schema() {
        let info = ToolInfo::from(Operation::AddReactionToPost);
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["name"], "add_reaction_to_post");
        assert_eq!(
            value["input_schema"]["required"],
            json!(["account_id", "post_social_id", "reaction_type"])
        );
        assert_eq!(
            value["input_schema"]["properties"]["reaction_type"]["enum"],
            json!(["like", "celebrate", "love", "insightful", "funny", "support"])
        );
    }

    #[test]
    fn optional_only_tools_have_empty_required_list() {
        let info = ToolInfo::from(Operation::ListAllChats);
        assert_eq!(info.input_schema["required"], json!([]));
        assert_eq!(info.input_schema["properties"]["unread"]["type"], "boolean");
    }
}
