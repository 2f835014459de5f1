use serde_json::Value;
use tracing::{debug, trace};

/// A dotted key (`name.first`) split once into its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    key: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(key: &str) -> Self {
        FieldPath {
            key: key.to_string(),
            segments: key.split('.').map(str::to_string).collect(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Walks the path through `root`. Any segment that cannot be followed yields `None`.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut value = root;
        for segment in &self.segments {
            value = match value {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(value)
    }

    /// Resolves the path to its display string. A path that cannot be followed resolves to
    /// the empty string, so missing data still filters and sorts.
    pub fn resolve(&self, root: &Value) -> String {
        self.lookup(root).map(display_value).unwrap_or_default()
    }
}

/// Script-style stringification of a resolved value.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => display_float(f),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

// Exponent notation outside [1e-6, 1e21), with an explicit sign on positive exponents.
fn display_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if f.abs() >= 1e21 || f.abs() < 1e-6 {
        let s = format!("{f:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        };
    }
    f.to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    pub path: FieldPath,
    pub visible: bool,
}

impl Column {
    pub fn new(label: &str, key: &str) -> Self {
        Column {
            label: label.to_string(),
            path: FieldPath::parse(key),
            visible: true,
        }
    }

    pub fn key(&self) -> &str {
        self.path.key()
    }
}

/// Ordered set of columns. The order is both display order and filter scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
}

impl Default for ColumnRegistry {
    fn default() -> Self {
        ColumnRegistry::new(vec![
            Column::new("Active", "isActive"),
            Column::new("Balance", "balance"),
            Column::new("First Name", "name.first"),
            Column::new("Last Name", "name.last"),
            Column::new("Company", "company"),
            Column::new("Email", "email"),
            Column::new("Address", "address"),
            Column::new("Favorite Fruit", "favoriteFruit"),
        ])
    }
}

impl ColumnRegistry {
    pub fn new(columns: Vec<Column>) -> Self {
        trace!("Registered {} columns", columns.len());
        ColumnRegistry { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn find(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key() == key)
    }

    pub fn any_visible(&self) -> bool {
        self.columns.iter().any(|c| c.visible)
    }

    /// Returns false if no column has the given key.
    pub fn set_visible(&mut self, key: &str, visible: bool) -> bool {
        match self.find(key) {
            Some(idx) => {
                self.columns[idx].visible = visible;
                debug!("Column \"{key}\" visible: {visible}");
                true
            }
            None => {
                debug!("No column with key \"{key}\"");
                false
            }
        }
    }

    /// Flips the visibility of the column at `idx` and returns the new state.
    pub fn toggle(&mut self, idx: usize) -> Option<bool> {
        let column = self.columns.get_mut(idx)?;
        column.visible = !column.visible;
        debug!("Column \"{}\" visible: {}", column.key(), column.visible);
        Some(column.visible)
    }
}
