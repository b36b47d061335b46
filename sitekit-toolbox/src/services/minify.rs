//! HTML minification.

use log::debug;
use minify_html::Cfg;

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::{MinifyRequest, MinifyResult};

pub const MISSING_HTML: &str = "html_code parameter is missing or empty.";

fn config(remove_comments: bool) -> Cfg {
    let mut cfg = Cfg::new();
    cfg.keep_comments = !remove_comments;
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg
}

/// Minify `request.html_code`, optionally stripping comments.
pub fn minify_html(request: &MinifyRequest) -> ToolboxResult<MinifyResult> {
    if request.html_code.is_empty() {
        return Err(ToolboxError::ValidationError(MISSING_HTML.to_string()));
    }

    let output = minify_html::minify(
        request.html_code.as_bytes(),
        &config(request.remove_comments),
    );
    let minified = String::from_utf8(output).map_err(|e| {
        ToolboxError::MinifyError(format!("minifier produced invalid UTF-8: {e}"))
    })?;

    let original_length = request.html_code.chars().count();
    let minified_length = minified.chars().count();
    debug!("[Minify] {original_length} -> {minified_length} chars");

    Ok(MinifyResult {
        minified_html: minified,
        original_length,
        minified_length,
        removed_comments: request.remove_comments,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PAGE: &str = "<!DOCTYPE html>\n<html>\n  <head>\n    <title> Demo </title>\n  </head>\n  <body>\n    <!-- banner -->\n    <div   class=\"hero\">\n      <p>Hello,   world</p>\n    </div>\n  </body>\n</html>\n";

    fn request(html: &str, remove_comments: bool) -> MinifyRequest {
        MinifyRequest {
            html_code: html.to_string(),
            remove_comments,
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = minify_html(&request("", false)).unwrap_err();
        assert!(err.is_expected());
    }

    #[test]
    fn test_minified_output_is_shorter() {
        let result = minify_html(&request(PAGE, false)).unwrap();
        assert_eq!(result.original_length, PAGE.chars().count());
        assert_eq!(result.minified_length, result.minified_html.chars().count());
        assert!(result.minified_length < result.original_length);
        assert!(result.minified_html.contains("Hello"));
    }

    #[test]
    fn test_comment_handling() {
        let kept = minify_html(&request(PAGE, false)).unwrap();
        assert!(kept.minified_html.contains("banner"));
        assert!(!kept.removed_comments);

        let stripped = minify_html(&request(PAGE, true)).unwrap();
        assert!(!stripped.minified_html.contains("banner"));
        assert!(stripped.removed_comments);
    }

    #[test]
    fn test_second_pass_shrinks_less() {
        let first = minify_html(&request(PAGE, true)).unwrap();
        let second = minify_html(&request(&first.minified_html, true)).unwrap();
        assert!(second.minified_length <= first.minified_length);
        let first_gain = first.original_length - first.minified_length;
        let second_gain = second.original_length - second.minified_length;
        assert!(second_gain < first_gain);
    }

    #[test]
    fn test_lengths_count_characters() {
        let result = minify_html(&request("<p>héllo  wörld</p>", false)).unwrap();
        assert_eq!(result.original_length, 19);
    }
}
