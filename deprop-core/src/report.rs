//! Output formatting - plaintext and JSON.

use crate::result::PropagationResult;

/// Renders a result as the human-readable summary printed by front ends.
pub fn render_plain(result: &PropagationResult) -> String {
    let mut out = String::new();
    out.push_str(&result.details);
    if !result.details.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    if result.success {
        out.push_str("STATUS: ok\n");
    } else {
        out.push_str("STATUS: failed\n");
    }
    out.push_str(&format!(
        "files updated: {}, methods deprecated: {}, classes deprecated: {}\n",
        result.files_updated, result.methods_marked, result.types_promoted
    ));
    if let Some(err) = &result.error {
        out.push_str(&format!("error: {}\n", err));
    }
    out
}

/// Prints a result in plain text format.
pub fn print_plain(result: &PropagationResult) {
    print!("{}", render_plain(result));
}

/// Prints a result in JSON format.
///
/// Falls back to the bare counters if serialization fails.
pub fn print_json(result: &PropagationResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!(
                "{{\"success\": {}, \"filesUpdated\": {}, \"methodsDeprecated\": {}, \"classesDeprecated\": {}}}",
                result.success, result.files_updated, result.methods_marked, result.types_promoted
            );
        }
    }
}
