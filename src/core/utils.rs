//! Utility functions for covid-compare.

/// Helper function to turn a count into a string with thousands separators
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }

    formatted
}

/// Strip the trailing line ending a prompt response was read with
pub fn trim_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
