// Filtres texte saisis par l'utilisateur : '%' et '_' sont des caractères, pas des jokers

use sea_orm::sea_query::{Alias, Condition, Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

const ESCAPE: char = '\\';

/// Échappe `\`, `%` et `_` pour un LIKE ... ESCAPE '\'
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn like<C: IntoColumnRef>(column: C, pattern: String) -> SimpleExpr {
    Expr::col(column).like(LikeExpr::new(pattern).escape(ESCAPE))
}

/// `column` contient `term` (insensible à la casse ASCII sous SQLite)
pub fn contains<C: IntoColumnRef>(column: C, term: &str) -> SimpleExpr {
    like(column, format!("%{}%", escape_like(term)))
}

/// `column` commence par `prefix`, à la casse près sur tous les moteurs :
/// le LIKE garde l'index, SUBSTR(...) = prefix tranche la casse sous SQLite
pub fn starts_with<C: IntoColumnRef + Clone>(column: C, prefix: &str) -> Condition {
    let length = prefix.chars().count() as i32;

    Condition::all()
        .add(like(column.clone(), format!("{}%", escape_like(prefix))))
        .add(
            Expr::expr(
                Func::cust(Alias::new("SUBSTR"))
                    .arg(Expr::col(column))
                    .arg(Expr::val(1))
                    .arg(Expr::val(length)),
            )
            .eq(prefix),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("salt"), "salt");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("s_lt"), "s\\_lt");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
