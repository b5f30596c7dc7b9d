//! Labelled field extraction from tender detail pages.
//!
//! The portal renders tender attributes as label/value pairs, but not
//! consistently: most pages use a `<th>label</th><td>value</td>` row, some use
//! `<td>` for both cells, and older pages put `label：value` inline in one
//! cell. Two patterns are tried in order; the first usable capture wins.

use regex::Regex;

use tenderbot_shared::{Result, TenderBotError};

use crate::text::{clean_text, strip_tags};

/// Upper bound on the characters taken from an inline `label: value` match.
const INLINE_VALUE_MAX_CHARS: usize = 150;

/// Precompiled patterns for one label.
#[derive(Debug, Clone)]
pub struct LabeledField {
    label: String,
    /// `<th>label</th><td>value</td>` (or td/td), value may contain markup.
    table_pair: Regex,
    /// `label: value` / `label：value` up to the next tag or line break.
    inline: Regex,
}

impl LabeledField {
    /// Compile the lookup patterns for `label`.
    pub fn new(label: &str) -> Result<Self> {
        let esc = regex::escape(label);

        let table_pair = Regex::new(&format!(
            r"(?is)<t[hd][^>]*>\s*{esc}\s*[:：]?\s*</t[hd]>\s*<t[hd][^>]*>(.*?)</t[hd]>"
        ))
        .map_err(|e| TenderBotError::parse(format!("label {label:?}: {e}")))?;

        let inline = Regex::new(&format!(r"(?i){esc}\s*[:：]\s*([^<\n\r]+)"))
            .map_err(|e| TenderBotError::parse(format!("label {label:?}: {e}")))?;

        Ok(Self {
            label: label.to_string(),
            table_pair,
            inline,
        })
    }

    /// The label this field looks for.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Find the label's value in `html`, cleaned for display.
    pub fn extract(&self, html: &str) -> Option<String> {
        self.table_pair_value(html)
            .or_else(|| self.inline_value(html))
    }

    fn table_pair_value(&self, html: &str) -> Option<String> {
        let caps = self.table_pair.captures(html)?;
        non_empty(clean_text(&strip_tags(caps.get(1)?.as_str())))
    }

    fn inline_value(&self, html: &str) -> Option<String> {
        let caps = self.inline.captures(html)?;
        let value: String = caps
            .get(1)?
            .as_str()
            .chars()
            .take(INLINE_VALUE_MAX_CHARS)
            .collect();
        non_empty(clean_text(&value))
    }
}

/// One-off lookup of `label` in `html`.
///
/// Compiles the patterns on every call; hot paths should hold a [`LabeledField`].
pub fn extract_labeled_field(html: &str, label: &str) -> Option<String> {
    LabeledField::new(label).ok()?.extract(html)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TENDER_TABLE: &str = r#"
        <table>
          <tr><th>機關名稱</th><td><span>高雄市小港區漢民國民小學</span></td></tr>
          <tr><th>標案名稱</th><td>114學年度六年級專題性戶外教育</td></tr>
        </table>"#;

    #[test]
    fn table_pair_with_nested_markup() {
        assert_eq!(
            extract_labeled_field(TENDER_TABLE, "機關名稱").as_deref(),
            Some("高雄市小港區漢民國民小學")
        );
        assert_eq!(
            extract_labeled_field(TENDER_TABLE, "標案名稱").as_deref(),
            Some("114學年度六年級專題性戶外教育")
        );
    }

    #[test]
    fn table_pair_with_td_cells_attributes_and_colon() {
        let html = "<tr>\n<td class=\"label\" width=\"20%\">\n  標案案名：\n</td>\n\
                    <td class=\"value\">\n  <div>道路<br>改善工程</div>\n</td></tr>";
        assert_eq!(
            extract_labeled_field(html, "標案案名").as_deref(),
            Some("道路 改善工程")
        );
    }

    #[test]
    fn label_match_is_exact_cell_content() {
        let html = "<tr><th>機關名稱(機關)</th><td>新北市政府</td></tr>";
        assert_eq!(extract_labeled_field(html, "機關名稱"), None);
        assert_eq!(
            extract_labeled_field(html, "機關名稱(機關)").as_deref(),
            Some("新北市政府")
        );
    }

    #[test]
    fn inline_form_ascii_and_fullwidth_colon() {
        let html = "<div>機關名稱: 臺中市政府 &amp; 建設局</div><p>標案名稱：道路養護\n第二行</p>";
        assert_eq!(
            extract_labeled_field(html, "機關名稱").as_deref(),
            Some("臺中市政府 & 建設局")
        );
        assert_eq!(
            extract_labeled_field(html, "標案名稱").as_deref(),
            Some("道路養護")
        );
    }

    #[test]
    fn inline_value_is_bounded() {
        let long = "字".repeat(400);
        let html = format!("標案名稱：{long}");
        let value = extract_labeled_field(&html, "標案名稱").unwrap();
        assert_eq!(value.chars().count(), INLINE_VALUE_MAX_CHARS);
    }

    #[test]
    fn empty_table_cell_falls_through_to_inline() {
        let html = "<tr><th>標案名稱</th><td> <span></span>\u{3000}</td></tr><p>標案名稱：備援名稱</p>";
        assert_eq!(
            extract_labeled_field(html, "標案名稱").as_deref(),
            Some("備援名稱")
        );
    }

    #[test]
    fn missing_label_is_none() {
        assert_eq!(extract_labeled_field(TENDER_TABLE, "決標金額"), None);
        assert_eq!(extract_labeled_field("", "機關名稱"), None);
    }

    #[test]
    fn malformed_html_is_treated_as_text() {
        let html = "<tr><th>機關名稱</th><td>未關閉 <b>標籤 <<<";
        // No closing cell, so the table form fails; no colon, so inline fails too.
        assert_eq!(extract_labeled_field(html, "機關名稱"), None);
        assert_eq!(
            extract_labeled_field("<<機關名稱：殘缺頁面>>", "機關名稱").as_deref(),
            Some("殘缺頁面>>")
        );
    }

    #[test]
    fn output_is_stable_under_recleaning() {
        let value = extract_labeled_field(TENDER_TABLE, "機關名稱").unwrap();
        assert_eq!(clean_text(&strip_tags(&value)), value);
    }
}
