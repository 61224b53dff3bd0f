#![no_main]

use libfuzzer_sys::fuzz_target;
use mcp_auth_gateway::tools::ToolDomain;

fuzz_target!(|data: &[u8]| {
    let Ok(serde_json::Value::Object(arguments)) = serde_json::from_slice(data) else {
        return;
    };

    for domain in [ToolDomain::Calculator, ToolDomain::Weather] {
        for tool in domain.registry().list() {
            // Coercion either yields arguments or an invalid-params error
            if let Err(err) = tool.schema().coerce(&arguments) {
                assert_eq!(err.code(), -32602);
            }
        }
    }
});
