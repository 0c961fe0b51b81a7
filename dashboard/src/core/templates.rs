//! Downloadable CSV templates, one per audience creation mode

use crate::types::{ExportArtifact, TemplateType};

const CUSTOMER_LIST_TEMPLATE: &str = "MADID,Email,Hashed_Email,First_Name,Last_Name
MAD12345678,john@example.com,5994471abb01112afcc18159f6cc74b4f511b99806da59b3caf5a9c173cacfc5,John,Doe
MAD87654321,jane@example.com,2e99758548972a8e8822ad47fa1017ff72f06f3ff6a016851f45c398732bc50c,Jane,Smith
MAD11223344,bob@example.com,be178c0543eb17f5f3043021c9e5fcf30285e557a4fc309cce97ff9ca6182912,Bob,Johnson";

const LOOKALIKE_TEMPLATE: &str = "User_ID,Purchase_Value,Engagement_Score,Frequency,Recency
USER001,150.50,8.5,12,7
USER002,89.99,6.2,8,14
USER003,299.99,9.1,15,3";

pub fn template_csv(kind: TemplateType) -> &'static str {
    match kind {
        TemplateType::CustomerList => CUSTOMER_LIST_TEMPLATE,
        TemplateType::Lookalike => LOOKALIKE_TEMPLATE,
    }
}

/// `<templateType>-template.csv`
pub fn template_filename(kind: TemplateType) -> String {
    format!("{}-template.csv", kind.as_str())
}

pub fn template_artifact(kind: TemplateType) -> ExportArtifact {
    ExportArtifact::csv(template_filename(kind), template_csv(kind).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_filenames() {
        assert_eq!(template_filename(TemplateType::CustomerList), "customer-list-template.csv");
        assert_eq!(template_filename(TemplateType::Lookalike), "lookalike-template.csv");
    }

    #[test]
    fn test_templates_have_rectangular_rows() {
        for kind in [TemplateType::CustomerList, TemplateType::Lookalike] {
            let mut lines = template_csv(kind).lines();
            let width = lines.next().unwrap().split(',').count();
            for line in lines {
                assert_eq!(line.split(',').count(), width, "{kind}: {line}");
            }
        }
    }
}
