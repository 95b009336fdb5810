//! Read query description for the hosted datastore.
//!
//! A `SelectQuery` is backend-neutral: the REST client renders it into PostgREST
//! query parameters and the in-memory store interprets it directly.

/// A column selected by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// `*`
    All,
    /// A single named column
    Named(String),
    /// A related row embedded through a foreign key
    Embed(Embed),
}

/// An embedded related row, rendered as `alias:foreign_key(col, ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    /// Key the related row is nested under in the result
    pub alias: String,
    /// Table the foreign key points into
    pub table: String,
    /// Column on the selected row holding the related row's id
    pub foreign_key: String,
    pub columns: Vec<String>,
}

impl Embed {
    /// The owning profile's display fields, joined through `user_id`.
    pub fn owner_profile() -> Self {
        Self {
            alias: "profiles".to_string(),
            table: "profiles".to_string(),
            foreign_key: "user_id".to_string(),
            columns: vec!["full_name".to_string(), "avatar_url".to_string()],
        }
    }

    fn render(&self) -> String {
        format!(
            "{}:{}({})",
            self.alias,
            self.foreign_key,
            self.columns.join(",")
        )
    }
}

/// Sort order applied to the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A read of rows from a single table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: String,
    pub columns: Vec<Column>,
    /// Equality filters as `(column, value)`
    pub filters: Vec<(String, String)>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn all_columns(mut self) -> Self {
        self.columns.push(Column::All);
        self
    }

    pub fn column(mut self, name: &str) -> Self {
        self.columns.push(Column::Named(name.to_string()));
        self
    }

    pub fn embed(mut self, embed: Embed) -> Self {
        self.columns.push(Column::Embed(embed));
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the `select` parameter; an empty column list selects everything.
    pub fn select_clause(&self) -> String {
        if self.columns.is_empty() {
            return "*".to_string();
        }
        self.columns
            .iter()
            .map(|column| match column {
                Column::All => "*".to_string(),
                Column::Named(name) => name.clone(),
                Column::Embed(embed) => embed.render(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Render as PostgREST query parameters.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.select_clause())];

        for (column, value) in &self.filters {
            pairs.push((column.clone(), format!("eq.{}", value)));
        }

        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            pairs.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        pairs
    }
}
