use crate::cli::table::{format_output, Table};
use crate::registry::ModelRegistry;
use crate::utils::errors::fmt_error_chain;
use crate::{die, ModelsArgs};

#[derive(serde::Serialize)]
struct ModelListing {
    model_id: String,
    name: Option<String>,
}

impl From<Vec<ModelListing>> for Table {
    fn from(value: Vec<ModelListing>) -> Self {
        let mut tab = Table::new();

        tab.set_header(vec!["MODEL", "NAME"]);

        for model in value {
            tab.add_row(vec![
                model.model_id,
                match model.name {
                    Some(name) => name,
                    None => "unknown".to_string(),
                },
            ]);
        }

        tab
    }
}

async fn get_available_models(registry: &ModelRegistry) -> Vec<ModelListing> {
    let mut models = match registry.client().models().await {
        Ok(models) => models,
        Err(err) => die!("failed to list models: {}", fmt_error_chain(&err)),
    };

    models.sort_by(|a, b| a.id.cmp(&b.id));

    models
        .into_iter()
        .map(|m| ModelListing {
            model_id: m.id,
            name: m.display_name,
        })
        .collect()
}

pub(crate) async fn models_cmd(registry: &ModelRegistry, args: &ModelsArgs) {
    let models = get_available_models(registry).await;

    format_output(models, args.format);
}
