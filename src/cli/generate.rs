use crate::fallback::{generate_with_fallback, FallbackError};
use crate::prompt::{script_prompt, MeetingBrief, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use crate::registry::ModelRegistry;
use crate::utils::errors::fmt_error_chain;
use crate::{die, GenerateArgs};

pub(crate) async fn generate_cmd(registry: &ModelRegistry, args: &GenerateArgs) {
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&args.duration) {
        die!(
            "the meeting duration must be between {} and {} minutes",
            MIN_DURATION_MINUTES,
            MAX_DURATION_MINUTES
        );
    }

    let brief = MeetingBrief {
        company: args.company.clone(),
        industry: args.industry.clone(),
        role: args.role,
        pain_point: args.pain_point.clone(),
        duration_minutes: args.duration,
        services: args.service.clone(),
    };

    let prompt = script_prompt(&brief);

    let generation = match generate_with_fallback(registry.endpoints(), &prompt).await {
        Ok(generation) => generation,
        Err(FallbackError::Exhausted { .. }) => {
            die!("every model is rate limited or over quota: wait 30-60 seconds and retry, or enable billing at https://aistudio.google.com/");
        }
        Err(FallbackError::Terminal { model, source }) => {
            die!(
                "generation failed: model {}: {}",
                model,
                fmt_error_chain(&source)
            );
        }
    };

    eprintln!("model: {}", generation.model);

    println!("{}", generation.text);
}
