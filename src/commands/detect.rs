//! Detect command handler: classify input without decoding it.

use anyhow::Result;
use cookieport_core::{is_encrypted, netscape};

use super::read_input;
use crate::cli::DetectArgs;

pub fn run_detect_command(args: &DetectArgs) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;
    println!("{}", classify(&raw));
    Ok(())
}

fn classify(raw: &str) -> &'static str {
    if is_encrypted(raw) {
        "encrypted"
    } else if netscape::validate(raw) {
        "plaintext (netscape)"
    } else {
        "plaintext"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(r#"[{"name":"a","value":"b"}]"#), "plaintext");
        assert_eq!(
            classify(".x.com\tTRUE\t/\tFALSE\t0\tsid\tabc"),
            "plaintext (netscape)"
        );
        let blob = cookieport_core::encrypt("a=1", "pw").unwrap();
        assert_eq!(classify(&blob), "encrypted");
    }
}
