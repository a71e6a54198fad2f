use serde::{Deserialize, Serialize};

// ===== Resume Analysis Service Types =====

/// Success body of the analysis service: the free-text report
#[derive(Debug, Serialize, Deserialize)]
pub struct AtsCheckResponse {
    pub analysis: String,
}

/// Error body of the analysis service; either field may be present
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AtsServiceError {
    pub detail: Option<String>,
    pub error: Option<String>,
}

impl AtsServiceError {
    pub fn message(&self) -> Option<&str> {
        self.detail.as_deref().or(self.error.as_deref())
    }
}
