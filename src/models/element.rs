use serde::{Deserialize, Serialize};

/// What the element inspector reports about a clicked UI element.
///
/// When the lookup failed upstream only `error` is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub app_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ElementDescriptor {
    pub fn new(
        name: impl Into<String>,
        element_type: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            element_type: element_type.into(),
            app_name: app_name.into(),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            app_name: "Unknown".into(),
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
