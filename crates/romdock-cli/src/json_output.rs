//! JSON output structures for the romdock CLI

use serde::Serialize;

/// Envelope wrapping any report for machine consumption
#[derive(Debug, Serialize)]
pub struct JsonEnvelope<'a, T: Serialize> {
    /// Operation metadata
    pub metadata: OperationMetadata,
    /// The operation's report
    pub report: &'a T,
}

/// Operation metadata
#[derive(Debug, Serialize)]
pub struct OperationMetadata {
    /// romdock version
    pub version: String,
    /// Operation name
    pub operation: String,
    /// When the operation completed
    pub timestamp: String,
    /// Target profile, when the operation had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

/// Print a report as a pretty JSON envelope on stdout
pub fn print_json<T: Serialize>(operation: &str, profile: Option<&str>, report: &T) {
    let envelope = JsonEnvelope {
        metadata: OperationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            operation: operation.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            profile: profile.map(str::to_string),
        },
        report,
    };
    match serde_json::to_string_pretty(&envelope) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize report: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let envelope = JsonEnvelope {
            metadata: OperationMetadata {
                version: "0.0.0".to_string(),
                operation: "sync".to_string(),
                timestamp: "2024-01-01T00:00:00Z".to_string(),
                profile: Some("miyoo-mini".to_string()),
            },
            report: &serde_json::json!({"synced": 1}),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["metadata"]["operation"], "sync");
        assert_eq!(value["report"]["synced"], 1);
    }
}
