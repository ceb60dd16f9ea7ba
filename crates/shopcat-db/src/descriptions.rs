//! Loader shared by the `*_descriptions` tables that hold a name and an
//! optional long text per language.

use std::collections::HashMap;

use shopcat_core::{Language, NamedDescription};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct NamedDescriptionRow {
    pub id: i64,
    pub owner_id: i64,
    pub language_id: i32,
    pub language_code: String,
    pub name: String,
    pub description: Option<String>,
}

/// A description table and the column pointing at its owner.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DescriptionTable {
    table: &'static str,
    owner_column: &'static str,
}

pub(crate) const MANUFACTURER: DescriptionTable = DescriptionTable {
    table: "manufacturer_descriptions",
    owner_column: "manufacturer_id",
};

pub(crate) const PRODUCT_TYPE: DescriptionTable = DescriptionTable {
    table: "product_type_descriptions",
    owner_column: "product_type_id",
};

pub(crate) const CATEGORY: DescriptionTable = DescriptionTable {
    table: "category_descriptions",
    owner_column: "category_id",
};

pub(crate) const OPTION: DescriptionTable = DescriptionTable {
    table: "product_option_descriptions",
    owner_column: "option_id",
};

pub(crate) const OPTION_VALUE: DescriptionTable = DescriptionTable {
    table: "product_option_value_descriptions",
    owner_column: "option_value_id",
};

/// Loads the descriptions of every owner in `owner_ids`, grouped by owner.
pub(crate) async fn load_named(
    pool: &PgPool,
    table: DescriptionTable,
    owner_ids: &[i64],
) -> Result<HashMap<i64, Vec<NamedDescription>>, sqlx::Error> {
    if owner_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!(
        "SELECT d.id, d.{owner} AS owner_id, l.id AS language_id, l.code AS language_code, \
                d.name, d.description \
         FROM {table} d \
         JOIN languages l ON l.id = d.language_id \
         WHERE d.{owner} = ANY($1) \
         ORDER BY d.id",
        owner = table.owner_column,
        table = table.table,
    );

    let rows = sqlx::query_as::<_, NamedDescriptionRow>(&sql)
        .bind(owner_ids)
        .fetch_all(pool)
        .await?;

    let mut grouped: HashMap<i64, Vec<NamedDescription>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.owner_id)
            .or_default()
            .push(NamedDescription {
                id: row.id,
                language: Language::new(row.language_id, row.language_code),
                name: row.name,
                description: row.description,
            });
    }
    Ok(grouped)
}
