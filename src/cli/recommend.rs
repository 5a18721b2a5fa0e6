use crate::candidates::{parse_candidates, ServiceCandidate};
use crate::cli::table::{format_output, Table};
use crate::fallback::{generate_with_fallback, FallbackError};
use crate::prompt::recommendation_prompt;
use crate::registry::ModelRegistry;
use crate::utils::errors::fmt_error_chain;
use crate::{die, RecommendArgs};

impl From<Vec<ServiceCandidate>> for Table {
    fn from(value: Vec<ServiceCandidate>) -> Self {
        let mut tab = Table::new();

        tab.set_header(vec!["SERVICE", "FIT"]);

        for candidate in value {
            tab.add_row(vec![candidate.name, candidate.score.to_string()]);
        }

        tab
    }
}

pub(crate) async fn recommend_cmd(registry: &ModelRegistry, args: &RecommendArgs) {
    let prompt = recommendation_prompt(&args.company, &args.industry, &args.pain_point);

    let generation = match generate_with_fallback(registry.endpoints(), &prompt).await {
        Ok(generation) => generation,
        Err(FallbackError::Exhausted { .. }) => {
            die!("failed to fetch service candidates: every model is rate limited or over quota, wait 30-60 seconds and retry");
        }
        Err(FallbackError::Terminal { model, source }) => {
            die!(
                "failed to fetch service candidates: model {}: {}",
                model,
                fmt_error_chain(&source)
            );
        }
    };

    eprintln!("model: {}", generation.model);

    let candidates = parse_candidates(&generation.text);

    format_output(candidates, args.format);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_tables_render_names_and_scores() {
        let candidates = vec![
            ServiceCandidate {
                name: "業務効率化コンサルティング".to_string(),
                score: 92,
            },
            ServiceCandidate {
                name: "候補2".to_string(),
                score: 50,
            },
        ];

        let tab: Table = candidates.into();
        let rendered = tab.to_string();

        assert!(rendered.starts_with("SERVICE"));
        assert!(rendered.contains("業務効率化コンサルティング"));
        assert!(rendered.contains("92"));
    }
}
