use chrono::NaiveDate;

use crate::models::dto::ShoppingListItem;

/// "tomato paste" -> "Tomato paste" (le reste passe en minuscules)
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Contenu texte du fichier de liste de courses
pub fn render(full_name: &str, date: NaiveDate, items: &[ShoppingListItem], recipes: &[String]) -> String {
    let mut lines = vec![
        format!("Shopping list for: \"{}\"", full_name),
        format!("Date: {}", date.format("%d.%m.%y")),
        "Ingredients:".to_string(),
    ];

    lines.extend(items.iter().enumerate().map(|(i, item)| {
        format!(
            "{}. {} ({}) - {}",
            i + 1,
            capitalize(&item.name),
            item.measurement_unit,
            item.total_amount
        )
    }));

    lines.push("Recipes:".to_string());
    lines.extend(recipes.iter().enumerate().map(|(i, name)| format!("{}. {}", i + 1, name)));

    lines.join("\n")
}
