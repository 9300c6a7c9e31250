use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::category::Cuisine;
use crate::model::recipe::Recipe;

struct Rule {
    cuisine: Cuisine,
    pattern: Regex,
}

fn rule(cuisine: Cuisine, pattern: &str) -> Rule {
    Rule {
        cuisine,
        // Patterns are literals below; a bad one is a programming error.
        pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid cuisine pattern: {e}")),
    }
}

// Source-provided cuisine tags.
static TAG_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(Cuisine::Italian, r"italian"),
        rule(Cuisine::Asian, r"(asian|japanese|chinese|korean|thai|indian|vietnamese)"),
        rule(Cuisine::MiddleEastern, r"(middle\s*eastern|arab|leban|turk|persian|iranian)"),
    ]
});

// Title and summary.
static TEXT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(Cuisine::Italian, r"(tiramisu|panna\s*cotta|cannoli|amaretto|mascarpone|ital|sicil)"),
        rule(
            Cuisine::Asian,
            r"(mochi|matcha|dorayaki|anko|japan|japanese|ramen|udon|sushi|thai|kimchi|korean|chinese|indian|masala)",
        ),
        rule(
            Cuisine::MiddleEastern,
            r"(baklava|kunafa|kanafeh|maamoul|halva|tahini|rose\s*water|orange\s*blossom|middle\s*east|arab|leban|turk|persian|iran)",
        ),
    ]
});

// Ingredient names.
static INGREDIENT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(Cuisine::Italian, r"(mascarpone|savoiardi|amaretto)"),
        rule(Cuisine::Asian, r"(matcha|azuki|black\s*sesame|rice\s*flour)"),
        rule(Cuisine::MiddleEastern, r"(tahini|date|rose\s*water|orange\s*blossom|cardamom)"),
    ]
});

fn first_match(rules: &[Rule], text: &str) -> Option<Cuisine> {
    rules.iter().find(|r| r.pattern.is_match(text)).map(|r| r.cuisine)
}

/// Maps a recipe to a cuisine. Structured tags win over title/summary text,
/// which win over ingredient names.
pub fn classify(recipe: &Recipe) -> Cuisine {
    let tags: Vec<String> = recipe.cuisines.iter().map(|c| c.to_lowercase()).collect();
    for r in TAG_RULES.iter() {
        if tags.iter().any(|t| r.pattern.is_match(t)) {
            return r.cuisine;
        }
    }

    let text = format!("{} {}", recipe.title, recipe.summary).to_lowercase();
    if let Some(c) = first_match(&TEXT_RULES, &text) {
        return c;
    }

    let ingredients = recipe.ingredients.join(" ").to_lowercase();
    first_match(&INGREDIENT_RULES, &ingredients).unwrap_or(Cuisine::Other)
}
