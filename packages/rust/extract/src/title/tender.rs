//! Tender detail pages: `機關名稱` + `標案名稱` → `agency：subject`.

use std::sync::LazyLock;

use super::{Page, TitleStrategy};
use crate::field::LabeledField;

/// Agency labels, preferred first.
const AGENCY_LABELS: [&str; 2] = ["機關名稱", "機關名稱(機關)"];

/// Subject labels, preferred first.
const SUBJECT_LABELS: [&str; 2] = ["標案名稱", "標案案名"];

/// Separator between agency and subject (full-width colon).
const SEPARATOR: char = '：';

static AGENCY_FIELDS: LazyLock<Vec<LabeledField>> = LazyLock::new(|| compile(&AGENCY_LABELS));
static SUBJECT_FIELDS: LazyLock<Vec<LabeledField>> = LazyLock::new(|| compile(&SUBJECT_LABELS));

fn compile(labels: &[&str]) -> Vec<LabeledField> {
    labels
        .iter()
        .map(|label| LabeledField::new(label).expect("tender label pattern"))
        .collect()
}

fn first_match(fields: &[LabeledField], html: &str) -> Option<String> {
    fields.iter().find_map(|field| field.extract(html))
}

/// Synthesizes `agency：subject` when both fields are present.
pub struct TenderTitle;

impl TitleStrategy for TenderTitle {
    fn extract(&self, page: &Page<'_>) -> Option<String> {
        let agency = first_match(&AGENCY_FIELDS, page.html())?;
        let subject = first_match(&SUBJECT_FIELDS, page.html())?;
        Some(format!("{agency}{SEPARATOR}{subject}"))
    }

    fn name(&self) -> &str {
        "tender"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_agency_and_subject() {
        let html = r#"
            <table>
              <tr><th>機關名稱</th><td><span>高雄市小港區漢民國民小學</span></td></tr>
              <tr><th>標案名稱</th><td>114學年度六年級專題性戶外教育</td></tr>
            </table>"#;
        assert_eq!(
            TenderTitle.extract(&Page::new(html)).as_deref(),
            Some("高雄市小港區漢民國民小學：114學年度六年級專題性戶外教育")
        );
    }

    #[test]
    fn falls_back_to_alternate_labels() {
        let html = "<tr><td>機關名稱(機關)</td><td>交通部公路局</td></tr>\
                    <tr><td>標案案名:</td><td>橋梁 &amp; 隧道檢測</td></tr>";
        assert_eq!(
            TenderTitle.extract(&Page::new(html)).as_deref(),
            Some("交通部公路局：橋梁 & 隧道檢測")
        );
    }

    #[test]
    fn requires_both_fields() {
        assert_eq!(TenderTitle.extract(&Page::new("<tr><th>機關名稱</th><td>X</td></tr>")), None);
        assert_eq!(TenderTitle.extract(&Page::new("<tr><th>標案名稱</th><td>Y</td></tr>")), None);
    }
}
