//! Read-only GraphQL endpoint over orders.
//!
//! Only the query subset the storefront uses is understood: an optional
//! `query Name(...)` header, nested selection sets, field aliases, and
//! scalar or `$variable` arguments. Root fields are resolved through the
//! order data fetchers and each result object is projected onto the
//! requested selection set.

use std::iter::Peekable;
use std::str::Chars;

use entity::{order_item, perfume};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::services::orders::{self, OrderWithItems};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
    #[serde(default)]
    pub operation_name: Option<String>,
}

/// Who is asking. Non-admin callers may only read their own orders.
#[derive(Debug, Clone)]
pub enum Scope {
    Admin,
    User(String),
}

// --- Parsing ---

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Str(String),
    Num(String),
    Punct(char),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Variable(String),
    Literal(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<(String, ArgValue)>,
    pub selection: Vec<Field>,
}

impl Field {
    fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

fn syntax(msg: impl Into<String>) -> AppError {
    AppError::BadRequest(format!("GraphQL syntax error: {}", msg.into()))
}

fn tokenize(input: &str) -> Result<Vec<Token>, AppError> {
    let mut tokens = Vec::new();
    let mut chars: Peekable<Chars<'_>> = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() || c == ',' => {
                chars.next();
            }
            '#' => {
                while chars.next().is_some_and(|c| c != '\n') {}
            }
            '{' | '}' | '(' | ')' | ':' | '$' | '!' | '[' | ']' | '=' => {
                tokens.push(Token::Punct(c));
                chars.next();
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => s.push('\n'),
                            Some(other) => s.push(other),
                            None => return Err(syntax("unterminated string")),
                        },
                        Some(other) => s.push(other),
                        None => return Err(syntax("unterminated string")),
                    }
                }
                tokens.push(Token::Str(s));
            }
            c if c == '-' || c.is_ascii_digit() => {
                let mut s = String::new();
                while let Some(&d) = chars.peek() {
                    if d == '-' || d == '.' || d.is_ascii_digit() {
                        s.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Num(s));
            }
            c if c == '_' || c.is_ascii_alphabetic() => {
                let mut s = String::new();
                while let Some(&d) = chars.peek() {
                    if d == '_' || d.is_ascii_alphanumeric() {
                        s.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Name(s));
            }
            other => return Err(syntax(format!("unexpected character {other:?}"))),
        }
    }

    Ok(tokens)
}

/// Deepest selection-set nesting accepted. The parser recurses per level.
pub const MAX_SELECTION_DEPTH: usize = 32;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, c: char) -> Result<(), AppError> {
        match self.next() {
            Some(Token::Punct(p)) if p == c => Ok(()),
            other => Err(syntax(format!("expected '{c}', found {other:?}"))),
        }
    }

    fn name(&mut self) -> Result<String, AppError> {
        match self.next() {
            Some(Token::Name(n)) => Ok(n),
            other => Err(syntax(format!("expected a name, found {other:?}"))),
        }
    }

    fn document(&mut self) -> Result<Vec<Field>, AppError> {
        if let Some(Token::Name(keyword)) = self.peek() {
            if keyword == "mutation" || keyword == "subscription" {
                return Err(AppError::BadRequest(format!(
                    "Operation type '{keyword}' is not supported"
                )));
            }
            if keyword != "query" {
                return Err(syntax(format!("unexpected '{keyword}'")));
            }
            self.next();
            if let Some(Token::Name(_)) = self.peek() {
                self.next();
            }
            if self.peek() == Some(&Token::Punct('(')) {
                self.skip_balanced('(', ')')?;
            }
        }

        let fields = self.selection_set()?;
        if let Some(extra) = self.peek() {
            return Err(syntax(format!("unexpected trailing {extra:?}")));
        }
        Ok(fields)
    }

    fn skip_balanced(&mut self, open: char, close: char) -> Result<(), AppError> {
        let mut depth = 0usize;
        loop {
            match self.next() {
                Some(Token::Punct(c)) if c == open => depth += 1,
                Some(Token::Punct(c)) if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(_) => {}
                None => return Err(syntax(format!("unbalanced '{open}'"))),
            }
        }
    }

    fn selection_set(&mut self) -> Result<Vec<Field>, AppError> {
        self.expect('{')?;
        self.depth += 1;
        if self.depth > MAX_SELECTION_DEPTH {
            return Err(AppError::BadRequest(format!(
                "Query exceeds the maximum selection depth of {MAX_SELECTION_DEPTH}"
            )));
        }
        let mut fields = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Punct('}')) => {
                    self.next();
                    break;
                }
                Some(_) => fields.push(self.field()?),
                None => return Err(syntax("unterminated selection set")),
            }
        }
        if fields.is_empty() {
            return Err(syntax("empty selection set"));
        }
        self.depth -= 1;
        Ok(fields)
    }

    fn field(&mut self) -> Result<Field, AppError> {
        let first = self.name()?;
        let (alias, name) = if self.peek() == Some(&Token::Punct(':')) {
            self.next();
            (Some(first), self.name()?)
        } else {
            (None, first)
        };

        let mut arguments = Vec::new();
        if self.peek() == Some(&Token::Punct('(')) {
            self.next();
            while self.peek() != Some(&Token::Punct(')')) {
                let arg = self.name()?;
                self.expect(':')?;
                arguments.push((arg, self.value()?));
            }
            self.expect(')')?;
        }

        let selection = if self.peek() == Some(&Token::Punct('{')) {
            self.selection_set()?
        } else {
            Vec::new()
        };

        Ok(Field {
            alias,
            name,
            arguments,
            selection,
        })
    }

    fn value(&mut self) -> Result<ArgValue, AppError> {
        match self.next() {
            Some(Token::Punct('$')) => Ok(ArgValue::Variable(self.name()?)),
            Some(Token::Str(s)) => Ok(ArgValue::Literal(Value::String(s))),
            Some(Token::Num(n)) => serde_json::from_str(&n)
                .map(ArgValue::Literal)
                .map_err(|_| syntax(format!("invalid number {n}"))),
            Some(Token::Name(n)) => match n.as_str() {
                "true" => Ok(ArgValue::Literal(Value::Bool(true))),
                "false" => Ok(ArgValue::Literal(Value::Bool(false))),
                "null" => Ok(ArgValue::Literal(Value::Null)),
                _ => Ok(ArgValue::Literal(Value::String(n))),
            },
            other => Err(syntax(format!("expected a value, found {other:?}"))),
        }
    }
}

pub fn parse(query: &str) -> Result<Vec<Field>, AppError> {
    Parser {
        tokens: tokenize(query)?,
        pos: 0,
        depth: 0,
    }
    .document()
}

// --- Output types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PerfumeObject {
    id: i32,
    perfume_title: String,
    perfumer: String,
    year: Option<i32>,
    country: Option<String>,
    perfume_gender: String,
    fragrance_top_notes: Option<String>,
    fragrance_middle_notes: Option<String>,
    fragrance_base_notes: Option<String>,
    price: i32,
    volume: Option<String>,
    #[serde(rename = "type")]
    perfume_type: Option<String>,
}

impl From<perfume::Model> for PerfumeObject {
    fn from(p: perfume::Model) -> Self {
        Self {
            id: p.id,
            perfume_title: p.perfume_title,
            perfumer: p.perfumer,
            year: p.year,
            country: p.country,
            perfume_gender: p.perfume_gender,
            fragrance_top_notes: p.fragrance_top_notes,
            fragrance_middle_notes: p.fragrance_middle_notes,
            fragrance_base_notes: p.fragrance_base_notes,
            price: p.price,
            volume: p.volume,
            perfume_type: p.perfume_type,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemObject {
    id: i32,
    quantity: i32,
    amount: i64,
    perfume: Option<PerfumeObject>,
}

impl OrderItemObject {
    fn new(item: order_item::Model, perfume: Option<perfume::Model>) -> Self {
        Self {
            id: item.id,
            quantity: item.quantity,
            amount: item.amount,
            perfume: perfume.map(PerfumeObject::from),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderObject {
    id: i32,
    email: String,
    first_name: String,
    last_name: String,
    city: String,
    address: String,
    phone_number: String,
    post_index: String,
    total_price: i64,
    status: String,
    date: String,
    order_items: Vec<OrderItemObject>,
}

impl From<OrderWithItems> for OrderObject {
    fn from(o: OrderWithItems) -> Self {
        let order = o.order;
        Self {
            id: order.id,
            email: order.email,
            first_name: order.first_name,
            last_name: order.last_name,
            city: order.city,
            address: order.address,
            phone_number: order.phone_number,
            post_index: order.post_index,
            total_price: order.total_price,
            status: order.status,
            date: order.created_at.to_string(),
            order_items: o
                .items
                .into_iter()
                .map(|i| OrderItemObject::new(i.item, i.perfume))
                .collect(),
        }
    }
}

// --- Execution ---

fn project(value: Value, selection: &[Field], type_name: &str) -> Result<Value, AppError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|v| project(v, selection, type_name))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(obj) => {
            if selection.is_empty() {
                return Err(AppError::BadRequest(format!(
                    "Field of type \"{type_name}\" must have a selection of subfields"
                )));
            }
            let mut out = Map::new();
            for field in selection {
                if field.name == "__typename" {
                    out.insert(
                        field.response_key().to_string(),
                        Value::String(type_name.to_string()),
                    );
                    continue;
                }
                // Looked up, not moved: a field may be selected more than once.
                let child = obj.get(&field.name).cloned().ok_or_else(|| {
                    AppError::BadRequest(format!(
                        "Cannot query field \"{}\" on type \"{type_name}\"",
                        field.name
                    ))
                })?;
                let child_type = match field.name.as_str() {
                    "orderItems" => "OrderItem",
                    "perfume" => "Perfume",
                    _ => "",
                };
                let projected = if field.selection.is_empty() {
                    if child.is_object() || child.is_array() {
                        return Err(AppError::BadRequest(format!(
                            "Field \"{}\" must have a selection of subfields",
                            field.name
                        )));
                    }
                    child
                } else {
                    project(child, &field.selection, child_type)?
                };
                out.insert(field.response_key().to_string(), projected);
            }
            Ok(Value::Object(out))
        }
        Value::Null => Ok(Value::Null),
        scalar => {
            if selection.is_empty() {
                Ok(scalar)
            } else {
                Err(AppError::BadRequest(format!(
                    "Scalar field on type \"{type_name}\" cannot have a selection"
                )))
            }
        }
    }
}

fn string_argument(
    field: &Field,
    arg: &str,
    variables: Option<&Map<String, Value>>,
) -> Result<String, AppError> {
    let value = field
        .arguments
        .iter()
        .find(|(name, _)| name == arg)
        .map(|(_, v)| match v {
            ArgValue::Literal(v) => Some(v.clone()),
            ArgValue::Variable(var) => variables.and_then(|vars| vars.get(var)).cloned(),
        })
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Field \"{}\" argument \"{arg}\" is required",
                field.name
            ))
        })?;

    match value {
        Some(Value::String(s)) => Ok(s),
        _ => Err(AppError::BadRequest(format!(
            "Argument \"{arg}\" must be a string"
        ))),
    }
}

/// Runs a query against the order data fetchers and returns `{"data": ...}`.
pub async fn execute(
    db: &DatabaseConnection,
    scope: &Scope,
    request: &GraphQLRequest,
) -> Result<Value, AppError> {
    let fields = parse(&request.query)?;
    let variables = request.variables.as_ref();

    let mut data = Map::new();
    for field in &fields {
        let orders = match field.name.as_str() {
            "orders" => match scope {
                Scope::Admin => orders::all_orders_query(db).await?,
                Scope::User(_) => return Err(AppError::Forbidden),
            },
            "ordersByEmail" => {
                let email = string_argument(field, "email", variables)?;
                if let Scope::User(own) = scope {
                    if *own != email {
                        return Err(AppError::Forbidden);
                    }
                }
                orders::user_orders_by_email_query(db, &email).await?
            }
            other => {
                return Err(AppError::BadRequest(format!(
                    "Cannot query field \"{other}\" on type \"Query\""
                )));
            }
        };

        let objects: Vec<OrderObject> = orders.into_iter().map(OrderObject::from).collect();
        let value = serde_json::to_value(objects)
            .map_err(|e| AppError::Internal(format!("GraphQL serialization: {e}")))?;
        data.insert(
            field.response_key().to_string(),
            project(value, &field.selection, "Order")?,
        );
    }

    Ok(serde_json::json!({ "data": data }))
}
