//! Walkthrough: generating validation checks for a small blog model.
//!
//! The `Article` class below stands in for a real object-relational
//! layer. One check set passes cleanly; a second is deliberately wrong
//! about the model, to show how the report reads when cases fail.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use modelspec::*;

type Row = BTreeMap<String, Value>;
type Table = Rc<RefCell<Vec<Row>>>;

struct ArticleClass {
    table: Table,
}

impl ArticleClass {
    fn seeded() -> Self {
        let mut row = Row::new();
        row.insert("headline".into(), Value::from("Launch day"));
        row.insert("slug".into(), Value::from("launch-day"));
        row.insert("word_count".into(), Value::from(800));
        row.insert("status".into(), Value::from("published"));
        ArticleClass {
            table: Rc::new(RefCell::new(vec![row])),
        }
    }
}

impl ModelClass for ArticleClass {
    fn name(&self) -> &str {
        "Article"
    }

    fn build(&self) -> Box<dyn ModelInstance> {
        Box::new(ArticleInstance {
            table: Rc::clone(&self.table),
            row: Row::new(),
            persisted_at: None,
            errors: BTreeMap::new(),
        })
    }

    fn find_first(&self) -> Option<Box<dyn ModelInstance>> {
        let row = self.table.borrow().first().cloned()?;
        Some(Box::new(ArticleInstance {
            table: Rc::clone(&self.table),
            row,
            persisted_at: Some(0),
            errors: BTreeMap::new(),
        }))
    }

    fn reflect_on_association(&self, association: &str) -> Option<Association> {
        match association {
            "comments" => Some(Association::new(AssociationKind::HasMany)),
            "author" => Some(Association::new(AssociationKind::BelongsTo)),
            _ => None,
        }
    }
}

struct ArticleInstance {
    table: Table,
    row: Row,
    persisted_at: Option<usize>,
    errors: BTreeMap<String, Vec<String>>,
}

impl ArticleInstance {
    fn attribute(&self, name: &str) -> Value {
        self.row.get(name).cloned().unwrap_or(Value::Nil)
    }

    fn validate(&mut self) {
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut record = |attribute: &str, message: &str| {
            errors
                .entry(attribute.to_string())
                .or_default()
                .push(message.to_string());
        };

        match self.attribute("headline") {
            Value::Nil => record("headline", "can't be blank"),
            Value::Text(headline) if headline.is_empty() => record("headline", "can't be blank"),
            Value::Text(headline) if headline.len() > 60 => {
                record("headline", "is too long (maximum is 60 characters)");
            }
            _ => {}
        }

        if let Value::Text(slug) = self.attribute("slug") {
            if slug.contains(' ') {
                record("slug", "is invalid");
            }
        }

        match self.attribute("word_count") {
            Value::Int(count) if count < 100 => record("word_count", "must be at least 100"),
            Value::Int(count) if count > 5000 => record("word_count", "must be at most 5000"),
            Value::Text(count) if count.parse::<f64>().is_err() => {
                record("word_count", "is not a number");
            }
            _ => {}
        }

        self.errors = errors;
    }
}

impl Attributes for ArticleInstance {
    fn get(&self, attribute: &str) -> Value {
        self.attribute(attribute)
    }

    fn set(&mut self, attribute: &str, value: Value) {
        self.row.insert(attribute.to_string(), value);
    }
}

impl ModelInstance for ArticleInstance {
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
        // `status` is only settable through the publishing workflow.
        if attribute != "status" {
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
                messages
                    .iter()
                    .map(move |message| format!("{} {}", attribute, message))
            })
            .collect()
    }
}

fn main() -> Result<()> {
    let mut classes = ClassRegistry::new();
    classes.insert(Rc::new(ArticleClass::seeded()));

    println!("A check set that matches the model:");
    println!();
    let mut cases = CaseRegistry::new("ArticleTest");
    Checks::for_suite("ArticleTest", &classes)?
        .require_attributes(&["headline"])
        .protect_attributes(&["status"])
        .reject_values_for("slug", ["launch day"])
        .allow_values_for("slug", ["launch-day-two"])
        .ensure_value_in_range("word_count", 100, 5000)
        .require_numeric_attributes(&["word_count"])
        .has_many(&["comments"])?
        .belongs_to(&["author"])?
        .register_into(&mut cases)?;
    println!("{}", cases.run_all());
    println!();

    println!("A check set that is wrong about the model:");
    println!();
    let mut wrong = CaseRegistry::new("ArticleTest");
    Checks::for_suite("ArticleTest", &classes)?
        .require_attributes(&["slug"])
        .protect_attributes(&["headline"])
        .register_into(&mut wrong)?;
    println!("{}", wrong.run_all());

    Ok(())
}
