//! Test-only fixture standing in for the model collaborator.
//!
//! A hand-written `Post` table with a handful of validation rules, one
//! mass-assignment-protected attribute, and a small association map.
//! Enough behavior to exercise every generator, nothing more.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::model::{Attributes, ModelClass, ModelInstance};
use crate::reflect::{Association, AssociationKind};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PostRow {
    pub title: Value,
    pub slug: Value,
    pub state: Value,
    pub email: Value,
    pub summary: Value,
    pub score: Value,
    pub price: Value,
}

impl PostRow {
    fn blank() -> Self {
        PostRow {
            title: Value::Nil,
            slug: Value::Nil,
            state: Value::Nil,
            email: Value::Nil,
            summary: Value::Nil,
            score: Value::Nil,
            price: Value::Nil,
        }
    }

    fn seeded() -> Self {
        PostRow {
            title: Value::from("First post"),
            slug: Value::from("first-post"),
            state: Value::from("draft"),
            email: Value::from("author@example.com"),
            summary: Value::from("welcome"),
            score: Value::from(50),
            price: Value::from(10),
        }
    }
}

type Table = Rc<RefCell<Vec<PostRow>>>;

/// Fixture class: validates title presence, slug uniqueness, email format,
/// summary length (3 to 10), score range (1 to 100), and price
/// numericality. `state` is protected from mass-assignment updates.
pub(crate) struct PostClass {
    table: Table,
}

impl PostClass {
    /// A table holding one valid persisted record.
    pub fn seeded() -> Self {
        PostClass {
            table: Rc::new(RefCell::new(vec![PostRow::seeded()])),
        }
    }

    /// A table with no records, for precondition tests.
    pub fn empty() -> Self {
        PostClass {
            table: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The first stored row, for observing persisted state from tests.
    pub fn first_row(&self) -> Option<PostRow> {
        self.table.borrow().first().cloned()
    }
}

impl ModelClass for PostClass {
    fn name(&self) -> &str {
        "Post"
    }

    fn build(&self) -> Box<dyn ModelInstance> {
        Box::new(PostInstance {
            table: Rc::clone(&self.table),
            row: PostRow::blank(),
            persisted_at: None,
            errors: BTreeMap::new(),
        })
    }

    fn find_first(&self) -> Option<Box<dyn ModelInstance>> {
        let row = self.table.borrow().first().cloned()?;
        Some(Box::new(PostInstance {
            table: Rc::clone(&self.table),
            row,
            persisted_at: Some(0),
            errors: BTreeMap::new(),
        }))
    }

    fn reflect_on_association(&self, association: &str) -> Option<Association> {
        match association {
            "comments" => Some(Association::new(AssociationKind::HasMany)),
            "voters" => Some(Association::new(AssociationKind::HasMany).through("votes")),
            "tags" => Some(Association::new(AssociationKind::HasAndBelongsToMany)),
            "author" => Some(Association::new(AssociationKind::BelongsTo)),
            "cover" => Some(Association::new(AssociationKind::HasOne)),
            _ => None,
        }
    }
}

pub(crate) struct PostInstance {
    table: Table,
    row: PostRow,
    persisted_at: Option<usize>,
    errors: BTreeMap<String, Vec<String>>,
}

impl PostInstance {
    fn validate(&mut self) {
        self.errors.clear();
        let row = self.row.clone();

        let title_blank = match &row.title {
            Value::Nil => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        };
        if title_blank {
            self.push_error("title", "can't be blank");
        }

        if let Value::Text(slug) = &row.slug {
            let taken = {
                let table = self.table.borrow();
                table
                    .iter()
                    .enumerate()
                    .any(|(i, other)| Some(i) != self.persisted_at && other.slug.as_text() == Some(slug))
            };
            if taken {
                self.push_error("slug", "has already been taken");
            }
        }

        if let Value::Text(email) = &row.email {
            if !email.contains('@') {
                self.push_error("email", "is invalid");
            }
        }

        if let Value::Text(summary) = &row.summary {
            if summary.len() < 3 {
                self.push_error("summary", "is too short (minimum is 3 characters)");
            }
            if summary.len() > 10 {
                self.push_error("summary", "is too long (maximum is 10 characters)");
            }
        }

        if let Value::Int(score) = row.score {
            if score < 1 {
                self.push_error("score", "must be greater than or equal to 1");
            }
            if score > 100 {
                self.push_error("score", "must be less than or equal to 100");
            }
        }

        if let Value::Text(price) = &row.price {
            if price.parse::<f64>().is_err() {
                self.push_error("price", "is not a number");
            }
        }
    }

    fn push_error(&mut self, attribute: &str, message: &str) {
        self.errors
            .entry(attribute.to_string())
            .or_default()
            .push(message.to_string());
    }
}

impl Attributes for PostInstance {
    fn get(&self, attribute: &str) -> Value {
        match attribute {
            "title" => self.row.title.clone(),
            "slug" => self.row.slug.clone(),
            "state" => self.row.state.clone(),
            "email" => self.row.email.clone(),
            "summary" => self.row.summary.clone(),
            "score" => self.row.score.clone(),
            "price" => self.row.price.clone(),
            _ => panic!("no attribute named `{attribute}` on `Post`"),
        }
    }

    fn set(&mut self, attribute: &str, value: Value) {
        let slot = match attribute {
            "title" => &mut self.row.title,
            "slug" => &mut self.row.slug,
            "state" => &mut self.row.state,
            "email" => &mut self.row.email,
            "summary" => &mut self.row.summary,
            "score" => &mut self.row.score,
            "price" => &mut self.row.price,
            _ => panic!("no attribute named `{attribute}` on `Post`"),
        };
        *slot = value;
    }
}

impl ModelInstance for PostInstance {
    fn is_valid(&mut self) -> bool {
        self.validate();
        self.errors.is_empty()
    }

    fn save(&mut self) -> bool {
        if !self.is_valid() {
            return false;
        }
        let mut table = self.table.borrow_mut();
        match self.persisted_at {
            Some(index) => table[index] = self.row.clone(),
            None => {
                table.push(self.row.clone());
                self.persisted_at = Some(table.len() - 1);
            }
        }
        true
    }

    fn update(&mut self, attribute: &str, value: Value) -> bool {
        // `state` is declared protected: mass assignment skips it silently.
        if attribute != "state" {
            self.set(attribute, value);
        }
        self.save()
    }

    fn errors_on(&self, attribute: &str) -> Vec<String> {
        self.errors.get(attribute).cloned().unwrap_or_default()
    }

    fn full_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|(attribute, messages)| {
                let mut chars = attribute.chars();
                let heading = match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                };
                messages
                    .iter()
                    .map(move |message| format!("{} {}", heading, message))
            })
            .collect()
    }
}
