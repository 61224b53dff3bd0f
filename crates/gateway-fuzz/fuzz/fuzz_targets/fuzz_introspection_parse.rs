#![no_main]

use libfuzzer_sys::fuzz_target;
use mcp_auth_gateway::models::{IdentityHeaders, IntrospectionResult};

fuzz_target!(|data: &[u8]| {
    if let Ok(claims) = serde_json::from_slice::<IntrospectionResult>(data) {
        // Header projection must reject, not panic, on hostile claims
        let _ = IdentityHeaders::from_claims(&claims).to_header_values();
    }
});
