//! Correlation types for comparison runs
//!
//! A comparison run (one pair of captures, or one pair of documents) is
//! tagged with a request id so its log events can be grouped afterwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Fresh time-ordered id (UUID v7)
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Adopt an id minted elsewhere
            pub fn from_string(s: String) -> Self {
                Self(s)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Identifies one comparison run
    RequestId
);

correlation_id!(
    /// Identifier supplied by an outer orchestration layer spanning several runs
    TraceId
);

/// Context carried through a comparison run for correlation
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Trace id as a string, empty when none was supplied
    pub fn trace_str(&self) -> &str {
        self.trace_id.as_ref().map(|t| t.as_str()).unwrap_or("")
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_distinct() {
        assert_ne!(RequestId::new(), RequestId::new());
        assert_ne!(TraceId::new(), TraceId::new());
        assert_eq!(RequestId::new().as_str().len(), 36);
    }

    #[test]
    fn test_display_and_conversions_agree() {
        let id = RequestId::from("run-9".to_string());
        assert_eq!(id.to_string(), "run-9");
        assert_eq!(AsRef::<str>::as_ref(&id), "run-9");
        assert_eq!(id, RequestId::from_string("run-9".to_string()));
    }

    #[test]
    fn test_request_id_round_trips_through_json() {
        let id = RequestId::from_string("run-1".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"run-1\"");
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_default_context_has_no_trace() {
        let ctx = RequestContext::default();
        assert!(ctx.trace_id.is_none());
        assert_eq!(ctx.trace_str(), "");
    }

    #[test]
    fn test_request_context_with_trace_id() {
        let trace_id = TraceId::from_string("trace-7".to_string());
        let ctx = RequestContext::with_request_id(RequestId::from_string("r".to_string()))
            .with_trace_id(trace_id.clone());

        assert_eq!(ctx.trace_id, Some(trace_id));
        assert_eq!(ctx.trace_str(), "trace-7");
        assert_eq!(ctx.request_id.as_str(), "r");
    }
}
