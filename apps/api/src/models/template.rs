use serde::Serialize;

use crate::models::document::TemplateId;

/// A gallery entry for one visual template.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateCard {
    pub id: TemplateId,
    pub name: &'static str,
    pub thumbnail: String,
    pub active: bool,
}

const THUMBNAIL_DIR: &str = "img";

fn catalog_entry(id: TemplateId) -> (&'static str, &'static str) {
    match id {
        TemplateId::Classic => ("Classic", "claasic.jpeg"),
        TemplateId::Modern => ("Modern", "modern.jpeg"),
        TemplateId::Minimal => ("Minimal", "minimal.jpeg"),
        TemplateId::Creative => ("Creative", "creative.jpeg"),
        TemplateId::Professional => ("Professional", "professonal.jpeg"),
        TemplateId::Elegant => ("Elegant", "elegent.jpeg"),
        TemplateId::Tech => ("Tech", "black tech.jpeg"),
        TemplateId::Bold => ("Bold", "bold.jpeg"),
        TemplateId::Clean => ("Clean", "clean.jpeg"),
        TemplateId::Contemporary => ("Contemporary", "contemperory.jpeg"),
    }
}

/// Builds the gallery with `active` set on the currently selected template.
pub fn template_catalog(active: TemplateId) -> Vec<TemplateCard> {
    TemplateId::ALL
        .iter()
        .map(|&id| {
            let (name, image) = catalog_entry(id);
            TemplateCard {
                id,
                name,
                thumbnail: format!("{THUMBNAIL_DIR}/{image}"),
                active: id == active,
            }
        })
        .collect()
}
