//! Translation of search criteria into SQL
//!
//! Every lookup selects the pet joined with its description. Search
//! criteria become `AND`-combined conditions with positional bind
//! parameters in the syntax of the target database.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::parser::{Pageable, Suchkriterien};

/// SQL flavour of a database backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    PostgreSQL,
    SQLite,
}

impl SqlDialect {
    /// Positional placeholder for the n-th (1-based) parameter
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            SqlDialect::PostgreSQL => format!("${}", index),
            SqlDialect::SQLite => format!("?{}", index),
        }
    }

    /// Case-insensitive LIKE operator
    pub fn ilike(&self) -> &'static str {
        match self {
            SqlDialect::PostgreSQL => "ILIKE",
            SqlDialect::SQLite => "LIKE",
        }
    }
}

/// A value bound to a positional parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
    BigInt(i64),
    Decimal(Decimal),
    Bool(bool),
    Date(NaiveDate),
}

/// SQL text together with its parameters in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// Query for one page of search results plus the matching count query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub select: BuiltQuery,
    pub count: BuiltQuery,
}

pub const SELECT_COLUMNS: &str = "h.id, h.version, h.name, h.\"alter\", h.art, h.gewicht, \
h.groesse, h.vermittelt, h.aufnahmedatum, h.rasse, h.schlagwoerter, h.erzeugt, h.aktualisiert, \
b.id AS beschreibung_id, b.beschreibung, b.haltungshinweise";

const FROM_JOIN: &str = "FROM haustier h INNER JOIN beschreibung b ON b.haustier_id = h.id";

const KEYWORD_VERSPIELT: &str = "VERSPIELT";
const KEYWORD_RUHIG: &str = "RUHIG";

pub struct QueryBuilder {
    dialect: SqlDialect,
}

impl QueryBuilder {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Lookup of a single pet by primary key
    pub fn build_id(&self, id: i64) -> BuiltQuery {
        BuiltQuery {
            sql: format!(
                "SELECT {} {} WHERE h.id = {}",
                SELECT_COLUMNS,
                FROM_JOIN,
                self.dialect.placeholder(1)
            ),
            params: vec![SqlParam::BigInt(id)],
        }
    }

    /// Photos of one pet, ordered by their ID
    pub fn build_fotos(&self) -> String {
        format!(
            "SELECT id, beschriftung, content_type FROM foto WHERE haustier_id = {} ORDER BY id",
            self.dialect.placeholder(1)
        )
    }

    /// Search with optional criteria and paging
    pub fn build(&self, criteria: &Suchkriterien, pageable: &Pageable) -> SearchQuery {
        tracing::debug!(
            "build: criteria={:?}, pageable={:?}",
            criteria,
            pageable
        );

        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();

        let mut push = |condition: &str, param: SqlParam, params: &mut Vec<SqlParam>| {
            params.push(param);
            conditions.push(condition.replace("{}", &self.dialect.placeholder(params.len())));
        };

        if let Some(beschreibung) = &criteria.beschreibung {
            let pattern = format!("%{}%", escape_like(beschreibung));
            let condition = format!("b.beschreibung {} {{}} ESCAPE '\\'", self.dialect.ilike());
            push(&condition, SqlParam::Text(pattern), &mut params);
        }
        if let Some(alter) = criteria.alter {
            push("h.\"alter\" >= {}", SqlParam::Int(alter), &mut params);
        }
        if let Some(gewicht) = criteria.gewicht {
            push("h.gewicht <= {}", SqlParam::Decimal(gewicht), &mut params);
        }
        if let Some(name) = &criteria.name {
            push("h.name = {}", SqlParam::Text(name.clone()), &mut params);
        }
        if let Some(art) = criteria.art {
            push("h.art = {}", SqlParam::Text(art.as_str().to_string()), &mut params);
        }
        if let Some(groesse) = criteria.groesse {
            push("h.groesse = {}", SqlParam::Decimal(groesse), &mut params);
        }
        if let Some(vermittelt) = criteria.vermittelt {
            push("h.vermittelt = {}", SqlParam::Bool(vermittelt), &mut params);
        }
        if let Some(aufnahmedatum) = criteria.aufnahmedatum {
            push("h.aufnahmedatum = {}", SqlParam::Date(aufnahmedatum), &mut params);
        }
        if let Some(rasse) = &criteria.rasse {
            push("h.rasse = {}", SqlParam::Text(rasse.clone()), &mut params);
        }
        if criteria.verspielt {
            conditions.push(format!("h.schlagwoerter LIKE '%{}%'", KEYWORD_VERSPIELT));
        }
        if criteria.ruhig {
            conditions.push(format!("h.schlagwoerter LIKE '%{}%'", KEYWORD_RUHIG));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let mut sql = format!(
            "SELECT {} {}{} ORDER BY h.id",
            SELECT_COLUMNS, FROM_JOIN, where_clause
        );
        if !pageable.is_unpaged() {
            sql.push_str(&format!(
                " LIMIT {} OFFSET {}",
                pageable.size,
                pageable.offset()
            ));
        }
        let count_sql = format!("SELECT COUNT(*) {}{}", FROM_JOIN, where_clause);

        tracing::debug!("build: sql={}", sql);

        SearchQuery {
            select: BuiltQuery {
                sql,
                params: params.clone(),
            },
            count: BuiltQuery {
                sql: count_sql,
                params,
            },
        }
    }
}

/// Escape LIKE wildcards so user input only matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HaustierArt;

    #[test]
    fn test_build_id() {
        let query = QueryBuilder::new(SqlDialect::PostgreSQL).build_id(7);
        assert!(query.sql.contains("INNER JOIN beschreibung b"));
        assert!(query.sql.ends_with("WHERE h.id = $1"));
        assert_eq!(query.params, vec![SqlParam::BigInt(7)]);
    }

    #[test]
    fn test_empty_criteria_without_where() {
        let query = QueryBuilder::new(SqlDialect::SQLite)
            .build(&Suchkriterien::default(), &Pageable::default());

        assert!(!query.select.sql.contains("WHERE"));
        assert!(query.select.sql.ends_with("ORDER BY h.id LIMIT 5 OFFSET 0"));
        assert_eq!(
            query.count.sql,
            "SELECT COUNT(*) FROM haustier h INNER JOIN beschreibung b ON b.haustier_id = h.id"
        );
        assert!(query.select.params.is_empty());
    }

    #[test]
    fn test_conditions_are_combined_with_and() {
        let criteria = Suchkriterien {
            beschreibung: Some("spiel".to_string()),
            alter: Some(2),
            gewicht: Some(Decimal::new(100, 1)),
            art: Some(HaustierArt::Hund),
            verspielt: true,
            ..Default::default()
        };
        let query = QueryBuilder::new(SqlDialect::PostgreSQL).build(&criteria, &Pageable::default());

        assert!(query.select.sql.contains(
            "WHERE b.beschreibung ILIKE $1 ESCAPE '\\' AND h.\"alter\" >= $2 AND h.gewicht <= $3 \
AND h.art = $4 AND h.schlagwoerter LIKE '%VERSPIELT%'"
        ));
        assert_eq!(
            query.select.params,
            vec![
                SqlParam::Text("%spiel%".to_string()),
                SqlParam::Int(2),
                SqlParam::Decimal(Decimal::new(100, 1)),
                SqlParam::Text("HUND".to_string()),
            ]
        );
        assert_eq!(query.count.params, query.select.params);
    }

    #[test]
    fn test_sqlite_placeholders_and_like() {
        let criteria = Suchkriterien {
            beschreibung: Some("ruhig".to_string()),
            vermittelt: Some(false),
            ruhig: true,
            ..Default::default()
        };
        let query = QueryBuilder::new(SqlDialect::SQLite).build(&criteria, &Pageable::default());

        assert!(query.select.sql.contains("b.beschreibung LIKE ?1"));
        assert!(query.select.sql.contains("h.vermittelt = ?2"));
        assert!(query.select.sql.contains("h.schlagwoerter LIKE '%RUHIG%'"));
    }

    #[test]
    fn test_paging() {
        let builder = QueryBuilder::new(SqlDialect::SQLite);
        let query = builder.build(&Suchkriterien::default(), &Pageable { number: 2, size: 10 });
        assert!(query.select.sql.ends_with("LIMIT 10 OFFSET 20"));

        let query = builder.build(&Suchkriterien::default(), &Pageable { number: 3, size: 0 });
        assert!(query.select.sql.ends_with("ORDER BY h.id"));
    }

    #[test]
    fn test_like_input_is_escaped() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
    }
}
