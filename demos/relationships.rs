//! Walkthrough: relationship checks plus `#[derive(Attributes)]`.
//!
//! The row struct derives its dynamic attribute access; the instance
//! wrapper adds the persistence behavior around it. Run with
//! `--features derive`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use modelspec::*;

#[derive(Attributes, Clone, Debug, Default)]
struct BookRow {
    title: String,
    isbn: String,
    pages: i64,
}

type Table = Rc<RefCell<Vec<BookRow>>>;

struct BookClass {
    table: Table,
}

impl BookClass {
    fn seeded() -> Self {
        let row = BookRow {
            title: "The Art of Indexing".to_string(),
            isbn: "978-0-00-000000-2".to_string(),
            pages: 320,
        };
        BookClass {
            table: Rc::new(RefCell::new(vec![row])),
        }
    }
}

impl ModelClass for BookClass {
    fn name(&self) -> &str {
        "Book"
    }

    fn build(&self) -> Box<dyn ModelInstance> {
        Box::new(BookInstance {
            table: Rc::clone(&self.table),
            row: BookRow::default(),
            persisted_at: None,
            errors: BTreeMap::new(),
        })
    }

    fn find_first(&self) -> Option<Box<dyn ModelInstance>> {
        let row = self.table.borrow().first().cloned()?;
        Some(Box::new(BookInstance {
            table: Rc::clone(&self.table),
            row,
            persisted_at: Some(0),
            errors: BTreeMap::new(),
        }))
    }

    fn reflect_on_association(&self, association: &str) -> Option<Association> {
        match association {
            "chapters" => Some(Association::new(AssociationKind::HasMany)),
            "reviewers" => Some(Association::new(AssociationKind::HasMany).through("reviews")),
            "genres" => Some(Association::new(AssociationKind::HasAndBelongsToMany)),
            "index" => Some(Association::new(AssociationKind::HasOne)),
            "author" => Some(Association::new(AssociationKind::BelongsTo)),
            _ => None,
        }
    }
}

struct BookInstance {
    table: Table,
    row: BookRow,
    persisted_at: Option<usize>,
    errors: BTreeMap<String, Vec<String>>,
}

impl Attributes for BookInstance {
    fn get(&self, attribute: &str) -> Value {
        self.row.get(attribute)
    }

    fn set(&mut self, attribute: &str, value: Value) {
        self.row.set(attribute, value);
    }
}

impl ModelInstance for BookInstance {
    fn is_valid(&mut self) -> bool {
        self.errors.clear();
        if self.row.title.is_empty() {
            self.errors
                .entry("title".to_string())
                .or_default()
                .push("can't be blank".to_string());
        }
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
        self.set(attribute, value);
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
    let subject: Rc<dyn ModelClass> = Rc::new(BookClass::seeded());

    let mut cases = CaseRegistry::new("BookTest");
    Checks::on(subject)
        .require_attributes(&["title"])
        .has_many(&["chapters"])?
        .has_many_through(&["reviewers"], "reviews")?
        .has_and_belongs_to_many(&["genres"])?
        .has_one(&["index"])?
        .belongs_to(&["author"])?
        .register_into(&mut cases)?;

    println!("{}", cases.run_all());
    Ok(())
}
