//! Parameterized WHERE-clause construction for the advanced player search.
//!
//! Criteria are optional; each one that is present contributes a single
//! conjunct. Column names only ever come from this crate, user values are
//! always bound parameters.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use guildhall_catalog::types::PlayerOverview;

use crate::operations::OperationError;
use crate::queries::{row_to_overview, PLAYER_OVERVIEW_SQL};

/// Inclusive bounds of a searchable field.
pub type Domain<T> = (T, T);

pub const LEVEL_DOMAIN: Domain<i64> = (1, 100);
pub const CONTRIBUTION_DOMAIN: Domain<i64> = (0, 1_000_000);
pub const DAMAGE_DOMAIN: Domain<i64> = (0, 10_000_000);
pub const RAID_DOMAIN: Domain<i64> = (0, 100);
pub const DATE_DOMAIN: Domain<&str> = ("0001-01-01", "9999-12-31");
pub const DATETIME_DOMAIN: Domain<&str> = ("0001-01-01 00:00", "9999-12-31 23:59");

/// An optional lower and upper bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Range<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Range<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn between(min: T, max: T) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub fn at_least(min: T) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: T) -> Self {
        Self::new(None, Some(max))
    }

    pub fn is_unset(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl Range<i64> {
    /// Numeric form fields use a sentinel (usually 0) for "no bound".
    pub fn from_sentinel(min: i64, max: i64, unset: i64) -> Self {
        Self::new(
            Some(min).filter(|v| *v != unset),
            Some(max).filter(|v| *v != unset),
        )
    }
}

pub type IntRange = Range<i64>;
pub type DateRange = Range<String>;

/// A WHERE fragment (without the keyword) and its parameters, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchClause {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SearchClause {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// `" WHERE …"`, or nothing when there are no criteria.
    pub fn where_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.sql)
        }
    }
}

/// Accumulates conjuncts for a [`SearchClause`].
#[derive(Debug, Default)]
pub struct WhereBuilder {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column LIKE %value%`.
    pub fn contains(&mut self, column: &'static str, value: Option<&str>) -> &mut Self {
        self.contains_any(&[column], value)
    }

    /// `(a LIKE ? OR b LIKE ? …)` with the same substring for every column.
    pub fn contains_any(&mut self, columns: &[&'static str], value: Option<&str>) -> &mut Self {
        let Some(value) = non_blank(value) else {
            return self;
        };
        if columns.is_empty() {
            return self;
        }
        let pattern = format!("%{}%", escape_like(value));
        let group = columns
            .iter()
            .map(|c| format!("{c} LIKE ? ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        if columns.len() == 1 {
            self.conditions.push(group);
        } else {
            self.conditions.push(format!("({group})"));
        }
        for _ in columns {
            self.params.push(Value::Text(pattern.clone()));
        }
        self
    }

    /// `column = ?` for a non-blank value.
    pub fn equals(&mut self, column: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(value) = non_blank(value) {
            self.conditions.push(format!("{column} = ?"));
            self.params.push(Value::Text(value.to_string()));
        }
        self
    }

    /// `column BETWEEN ? AND ?`, defaulting a missing bound to the domain.
    pub fn int_range(
        &mut self,
        column: &'static str,
        range: &IntRange,
        domain: Domain<i64>,
    ) -> &mut Self {
        if range.is_unset() {
            return self;
        }
        self.conditions.push(format!("{column} BETWEEN ? AND ?"));
        self.params.push(Value::Integer(range.min.unwrap_or(domain.0)));
        self.params.push(Value::Integer(range.max.unwrap_or(domain.1)));
        self
    }

    /// Date or date-time range over ISO-8601 text.
    pub fn text_range(
        &mut self,
        column: &'static str,
        range: &DateRange,
        domain: Domain<&str>,
    ) -> &mut Self {
        let min = non_blank(range.min.as_deref());
        let max = non_blank(range.max.as_deref());
        if min.is_none() && max.is_none() {
            return self;
        }
        self.conditions.push(format!("{column} BETWEEN ? AND ?"));
        self.params.push(Value::Text(min.unwrap_or(domain.0).to_string()));
        self.params.push(Value::Text(max.unwrap_or(domain.1).to_string()));
        self
    }

    pub fn build(self) -> SearchClause {
        SearchClause {
            sql: self.conditions.join(" AND "),
            params: self.params,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Escape LIKE wildcards so user text matches literally.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

// ── Player Search ───────────────────────────────────────────────────────────

/// Advanced player search criteria. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerCriteria {
    /// Substring of nickname, tag or status.
    pub text: Option<String>,
    pub nickname: Option<String>,
    pub tag: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    pub class_name: Option<String>,
    pub level: IntRange,
    pub contribution: IntRange,
    pub damage: IntRange,
    pub raid: IntRange,
    pub joined: DateRange,
}

/// Build the WHERE fragment for a player search over the overview columns.
pub fn build_search_clause(criteria: &PlayerCriteria) -> SearchClause {
    let mut b = WhereBuilder::new();
    b.contains_any(
        &["nickname", "tag", "guild_status"],
        criteria.text.as_deref(),
    )
    .contains("nickname", criteria.nickname.as_deref())
    .contains("tag", criteria.tag.as_deref())
    .equals("guild_status", criteria.status.as_deref())
    .equals("leadership_rank", criteria.role.as_deref())
    .equals("class_name", criteria.class_name.as_deref())
    .int_range("level", &criteria.level, LEVEL_DOMAIN)
    .int_range("resources_contributed", &criteria.contribution, CONTRIBUTION_DOMAIN)
    .int_range("weekly_damage", &criteria.damage, DAMAGE_DOMAIN)
    .int_range("raid_participation", &criteria.raid, RAID_DOMAIN)
    .text_range("joined_date", &criteria.joined, DATE_DOMAIN);
    b.build()
}

/// Run a player search. No criteria returns every player.
pub fn search_players(
    conn: &Connection,
    criteria: &PlayerCriteria,
) -> Result<Vec<PlayerOverview>, OperationError> {
    let clause = build_search_clause(criteria);
    let sql = format!(
        "SELECT * FROM ({PLAYER_OVERVIEW_SQL}){} ORDER BY nickname",
        clause.where_sql()
    );
    log::debug!("Player search: {sql} {:?}", clause.params);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(clause.params.iter()), row_to_overview)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_criteria_build_nothing() {
        let clause = build_search_clause(&PlayerCriteria::default());
        assert!(clause.is_empty());
        assert!(clause.params.is_empty());
        assert_eq!(clause.where_sql(), "");
    }

    #[test]
    fn level_range_binds_both_bounds() {
        let clause = build_search_clause(&PlayerCriteria {
            level: Range::between(10, 20),
            ..Default::default()
        });
        assert_eq!(clause.sql, "level BETWEEN ? AND ?");
        assert_eq!(clause.params, vec![Value::Integer(10), Value::Integer(20)]);
    }

    #[test]
    fn open_range_uses_domain() {
        let clause = build_search_clause(&PlayerCriteria {
            damage: Range::at_least(5_000),
            ..Default::default()
        });
        assert_eq!(clause.sql, "weekly_damage BETWEEN ? AND ?");
        assert_eq!(
            clause.params,
            vec![Value::Integer(5_000), Value::Integer(10_000_000)]
        );
    }

    #[test]
    fn text_search_is_one_or_group() {
        let clause = build_search_clause(&PlayerCriteria {
            text: Some(" игрок ".into()),
            status: Some("Активен".into()),
            ..Default::default()
        });
        assert_eq!(
            clause.sql,
            "(nickname LIKE ? ESCAPE '\\' OR tag LIKE ? ESCAPE '\\' OR guild_status LIKE ? ESCAPE '\\') \
             AND guild_status = ?"
        );
        assert_eq!(clause.params.len(), 4);
        assert_eq!(clause.params[0], Value::Text("%игрок%".into()));
        assert_eq!(clause.params[3], Value::Text("Активен".into()));
    }

    #[test]
    fn blank_strings_are_ignored() {
        let clause = build_search_clause(&PlayerCriteria {
            nickname: Some("   ".into()),
            joined: Range::new(Some(String::new()), None),
            ..Default::default()
        });
        assert!(clause.is_empty());
    }

    #[test]
    fn date_range_defaults_lower_bound() {
        let clause = build_search_clause(&PlayerCriteria {
            joined: Range::at_most("2024-06-30".to_string()),
            ..Default::default()
        });
        assert_eq!(clause.sql, "joined_date BETWEEN ? AND ?");
        assert_eq!(
            clause.params,
            vec![
                Value::Text("0001-01-01".into()),
                Value::Text("2024-06-30".into())
            ]
        );
    }

    #[test]
    fn sentinel_zero_means_unset() {
        assert!(Range::from_sentinel(0, 0, 0).is_unset());
        assert_eq!(Range::from_sentinel(5, 0, 0), Range::at_least(5));
        assert_eq!(Range::from_sentinel(0, 9, 0), Range::at_most(9));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn conjuncts_keep_parameter_order() {
        let clause = build_search_clause(&PlayerCriteria {
            tag: Some("@user".into()),
            level: Range::between(1, 50),
            raid: Range::at_least(3),
            ..Default::default()
        });
        assert_eq!(
            clause.sql,
            "tag LIKE ? ESCAPE '\\' AND level BETWEEN ? AND ? AND raid_participation BETWEEN ? AND ?"
        );
        assert_eq!(
            clause.params,
            vec![
                Value::Text("%@user%".into()),
                Value::Integer(1),
                Value::Integer(50),
                Value::Integer(3),
                Value::Integer(100),
            ]
        );
    }
}
