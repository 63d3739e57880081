//! Declarative check generators for model validation, persistence, and
//! relationship metadata.
//!
//! [`Checks`] is a consuming builder: each method takes one rule
//! specification and appends one independently named case per attribute,
//! value, or association, so a single failure never masks its siblings.
//! The built cases are handed off explicitly through
//! [`into_cases`](Checks::into_cases) or
//! [`register_into`](Checks::register_into); nothing executes during
//! generation.

use std::rc::Rc;

use crate::case::{Case, CaseSink};
use crate::error::{ModelSpecError, Result, Verdict};
use crate::model::{subject_name, Attributes as _, ClassResolver, ModelClass, ModelInstance as _};
use crate::reflect::AssociationKind;
use crate::value::Value;

/// Builder that turns rule specifications into named check cases for one
/// subject class.
pub struct Checks {
    subject: Rc<dyn ModelClass>,
    cases: Vec<Case>,
}

impl std::fmt::Debug for Checks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checks")
            .field("subject", &self.subject.name())
            .field(
                "cases",
                &self.cases.iter().map(Case::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Checks {
    /// Start a check set for an explicitly given subject class.
    pub fn on(subject: Rc<dyn ModelClass>) -> Self {
        Checks {
            subject,
            cases: Vec::new(),
        }
    }

    /// Start a check set for the class named by a suite.
    ///
    /// Strips one trailing `Test` token from the suite name and resolves
    /// the remainder through the resolver collaborator. Resolution happens
    /// here, once, and a failure aborts suite construction.
    pub fn for_suite(suite_name: &str, resolver: &dyn ClassResolver) -> Result<Self> {
        let class_name = subject_name(suite_name);
        let subject =
            resolver
                .resolve(class_name)
                .ok_or_else(|| ModelSpecError::ClassResolution {
                    class_name: class_name.to_string(),
                })?;
        Ok(Checks::on(subject))
    }

    /// The subject class these checks run against.
    pub fn subject(&self) -> &Rc<dyn ModelClass> {
        &self.subject
    }

    /// Ensure the model cannot be saved while any listed attribute is
    /// unset.
    pub fn require_attributes(mut self, attributes: &[&str]) -> Self {
        for &attribute in attributes {
            let subject = Rc::clone(&self.subject);
            let attribute = attribute.to_string();
            self.cases.push(Case::new(
                format!("require {} to be set", attribute),
                move || {
                    let mut object = subject.build();
                    if object.is_valid() {
                        return Verdict::fail("Instance is still valid");
                    }
                    let errors = object.errors_on(&attribute);
                    if errors.is_empty() {
                        return Verdict::fail("No errors found");
                    }
                    if !includes(&errors, "can't be blank") {
                        return Verdict::fail("Error message doesn't match");
                    }
                    Verdict::pass()
                },
            ));
        }
        self
    }

    /// Ensure the model cannot be saved when a listed attribute duplicates
    /// an existing record's value. Requires an existing record.
    pub fn require_unique_attributes(mut self, attributes: &[&str]) -> Self {
        for &attribute in attributes {
            let subject = Rc::clone(&self.subject);
            let attribute = attribute.to_string();
            self.cases.push(Case::new(
                format!("require unique value for {}", attribute),
                move || {
                    let Some(existing) = subject.find_first() else {
                        return Verdict::fail(format!("Can't find first {}", subject.name()));
                    };
                    let mut object = subject.build();
                    object.set(&attribute, existing.get(&attribute));
                    if object.is_valid() {
                        return Verdict::fail("Instance is still valid");
                    }
                    let errors = object.errors_on(&attribute);
                    if errors.is_empty() {
                        return Verdict::fail("No errors found");
                    }
                    if !includes(&errors, "has already been taken") {
                        return Verdict::fail("Error message doesn't match");
                    }
                    Verdict::pass()
                },
            ));
        }
        self
    }

    /// Ensure each listed attribute cannot be changed through a
    /// mass-assignment update: the update reports success and the value
    /// stays what it was. Requires an existing record.
    pub fn protect_attributes(mut self, attributes: &[&str]) -> Self {
        for &attribute in attributes {
            let subject = Rc::clone(&self.subject);
            let attribute = attribute.to_string();
            self.cases.push(Case::new(
                format!("not allow {} to be changed by update", attribute),
                move || {
                    let Some(mut object) = subject.find_first() else {
                        return Verdict::fail(format!("Can't find first {}", subject.name()));
                    };
                    let original = object.get(&attribute);
                    if !object.update(&attribute, Value::Int(1)) {
                        return Verdict::fail(format!(
                            "Cannot update {} with {} set to 1: {}",
                            subject.name(),
                            attribute,
                            object.full_messages().join(", "),
                        ));
                    }
                    if !object.is_valid() {
                        return Verdict::fail(format!(
                            "{} isn't valid after changing {}",
                            subject.name(),
                            attribute,
                        ));
                    }
                    if object.get(&attribute) != original {
                        return Verdict::fail(format!(
                            "Was able to change {}#{}",
                            subject.name(),
                            attribute,
                        ));
                    }
                    Verdict::pass()
                },
            ));
        }
        self
    }

    /// Ensure the attribute cannot be set to any of the given values.
    /// Requires an existing record.
    pub fn reject_values_for<I, V>(mut self, attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        for value in values {
            let value = value.into();
            let subject = Rc::clone(&self.subject);
            let attribute = attribute.to_string();
            self.cases.push(Case::new(
                format!("not allow {} to be set to \"{}\"", attribute, value),
                move || {
                    let Some(mut object) = subject.find_first() else {
                        return Verdict::fail(format!("Can't find first {}", subject.name()));
                    };
                    object.set(&attribute, value.clone());
                    if object.save() {
                        return Verdict::fail(format!(
                            "Saved {} with {} set to \"{}\"",
                            subject.name(),
                            attribute,
                            value,
                        ));
                    }
                    let errors = object.errors_on(&attribute);
                    if errors.is_empty() {
                        return Verdict::fail(format!(
                            "There are no errors set on {} after being set to \"{}\"",
                            attribute, value,
                        ));
                    }
                    if !matches_pattern(&errors, "invalid") {
                        return Verdict::fail(format!(
                            "Error set on {} doesn't include \"invalid\" when set to \"{}\"",
                            attribute, value,
                        ));
                    }
                    Verdict::pass()
                },
            ));
        }
        self
    }

    /// Ensure the attribute can be set to each of the given values. The
    /// save result itself is not asserted; the case only demands that no
    /// "invalid" error lands on the attribute. Requires an existing record.
    pub fn allow_values_for<I, V>(mut self, attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        for value in values {
            let value = value.into();
            let subject = Rc::clone(&self.subject);
            let attribute = attribute.to_string();
            self.cases.push(Case::new(
                format!("allow {} to be set to \"{}\"", attribute, value),
                move || {
                    let Some(mut object) = subject.find_first() else {
                        return Verdict::fail(format!("Can't find first {}", subject.name()));
                    };
                    object.set(&attribute, value.clone());
                    let _ = object.save();
                    if matches_pattern(&object.errors_on(&attribute), "invalid") {
                        return Verdict::fail(format!(
                            "Error set on {} includes \"invalid\" when set to \"{}\"",
                            attribute, value,
                        ));
                    }
                    Verdict::pass()
                },
            ));
        }
        self
    }

    /// Ensure the attribute's length is constrained to the given range.
    ///
    /// Builds the boundary strings directly: a filler repeated `min - 1`
    /// and `max + 1` times. Each must fail to save with a "short" or
    /// "long" error. A `min` of zero generates no short-side case, since
    /// no string is shorter than empty. Requires an existing record.
    pub fn ensure_length_in_range(mut self, attribute: &str, min: usize, max: usize) -> Self {
        if min > 0 {
            let short_case = self.length_case(
                attribute,
                format!("not allow {} to be less than {} chars long", attribute, min),
                "x".repeat(min - 1),
                "short",
            );
            self.cases.push(short_case);
        }
        let long_case = self.length_case(
            attribute,
            format!("not allow {} to be more than {} chars long", attribute, max),
            "x".repeat(max + 1),
            "long",
        );
        self.cases.push(long_case);
        self
    }

    fn length_case(
        &self,
        attribute: &str,
        name: String,
        boundary_value: String,
        pattern: &'static str,
    ) -> Case {
        let subject = Rc::clone(&self.subject);
        let attribute = attribute.to_string();
        Case::new(name, move || {
            let Some(mut object) = subject.find_first() else {
                return Verdict::fail(format!("Can't find first {}", subject.name()));
            };
            object.set(&attribute, Value::Text(boundary_value.clone()));
            if object.save() {
                return Verdict::fail(format!(
                    "Saved {} with {} set to \"{}\"",
                    subject.name(),
                    attribute,
                    boundary_value,
                ));
            }
            let errors = object.errors_on(&attribute);
            if errors.is_empty() {
                return Verdict::fail(format!(
                    "There are no errors set on {} after being set to \"{}\"",
                    attribute, boundary_value,
                ));
            }
            if !matches_pattern(&errors, pattern) {
                return Verdict::fail(format!(
                    "Error set on {} doesn't include \"{}\" when set to \"{}\"",
                    attribute, pattern, boundary_value,
                ));
            }
            Verdict::pass()
        })
    }

    /// Ensure the attribute's value is constrained to the given range.
    ///
    /// Tries `min - 1` and `max + 1`; each must fail to save with errors
    /// recorded against the attribute. Integer ranges only. Requires an
    /// existing record.
    pub fn ensure_value_in_range(mut self, attribute: &str, min: i64, max: i64) -> Self {
        let below_case = self.range_case(
            attribute,
            format!("not allow {} to be less than {}", attribute, min),
            min - 1,
        );
        self.cases.push(below_case);
        let above_case = self.range_case(
            attribute,
            format!("not allow {} to be more than {}", attribute, max),
            max + 1,
        );
        self.cases.push(above_case);
        self
    }

    fn range_case(&self, attribute: &str, name: String, boundary_value: i64) -> Case {
        let subject = Rc::clone(&self.subject);
        let attribute = attribute.to_string();
        Case::new(name, move || {
            let Some(mut object) = subject.find_first() else {
                return Verdict::fail(format!("Can't find first {}", subject.name()));
            };
            object.set(&attribute, Value::Int(boundary_value));
            if object.save() {
                return Verdict::fail(format!(
                    "Saved {} with {} set to \"{}\"",
                    subject.name(),
                    attribute,
                    boundary_value,
                ));
            }
            if object.errors_on(&attribute).is_empty() {
                return Verdict::fail(format!(
                    "There are no errors set on {} after being set to \"{}\"",
                    attribute, boundary_value,
                ));
            }
            Verdict::pass()
        })
    }

    /// Ensure each listed attribute only accepts numeric values. Requires
    /// an existing record.
    pub fn require_numeric_attributes(mut self, attributes: &[&str]) -> Self {
        for &attribute in attributes {
            let subject = Rc::clone(&self.subject);
            let attribute = attribute.to_string();
            self.cases.push(Case::new(
                format!("only allow numeric values for {}", attribute),
                move || {
                    let Some(mut object) = subject.find_first() else {
                        return Verdict::fail(format!("Can't find first {}", subject.name()));
                    };
                    object.set(&attribute, Value::from("abcd"));
                    if object.is_valid() {
                        return Verdict::fail("Instance is still valid");
                    }
                    let errors = object.errors_on(&attribute);
                    if errors.is_empty() {
                        return Verdict::fail("No errors found");
                    }
                    if !includes(&errors, "is not a number") {
                        return Verdict::fail("Error message doesn't match");
                    }
                    Verdict::pass()
                },
            ));
        }
        self
    }

    /// Ensure each listed has-many relationship is declared.
    pub fn has_many(self, associations: &[&str]) -> Result<Self> {
        self.association_checks(associations, AssociationKind::HasMany, None)
    }

    /// Ensure each listed has-many relationship is declared and goes
    /// through the given join association.
    pub fn has_many_through(self, associations: &[&str], through: &str) -> Result<Self> {
        self.association_checks(associations, AssociationKind::HasMany, Some(through))
    }

    /// Ensure each listed has-one relationship is declared.
    pub fn has_one(self, associations: &[&str]) -> Result<Self> {
        self.association_checks(associations, AssociationKind::HasOne, None)
    }

    /// Ensure each listed belongs-to relationship is declared.
    pub fn belongs_to(self, associations: &[&str]) -> Result<Self> {
        self.association_checks(associations, AssociationKind::BelongsTo, None)
    }

    /// Ensure each listed has-and-belongs-to-many relationship is
    /// declared.
    pub fn has_and_belongs_to_many(self, associations: &[&str]) -> Result<Self> {
        self.association_checks(associations, AssociationKind::HasAndBelongsToMany, None)
    }

    fn association_checks(
        mut self,
        associations: &[&str],
        kind: AssociationKind,
        through: Option<&str>,
    ) -> Result<Self> {
        for &association in associations {
            // An association the class never declared is a misconfigured
            // suite, caught here rather than at case execution.
            if self.subject.reflect_on_association(association).is_none() {
                return Err(ModelSpecError::UnknownAssociation {
                    class_name: self.subject.name().to_string(),
                    association: association.to_string(),
                });
            }

            let name = match through {
                Some(target) => format!("{} {} through {}", case_phrase(kind), association, target),
                None => format!("{} {}", case_phrase(kind), association),
            };
            let subject = Rc::clone(&self.subject);
            let association = association.to_string();
            let through = through.map(str::to_string);
            self.cases.push(Case::new(name, move || {
                let Some(reflection) = subject.reflect_on_association(&association) else {
                    return Verdict::fail(format!(
                        "No association {} on {}",
                        association,
                        subject.name(),
                    ));
                };
                if reflection.kind != kind {
                    return Verdict::fail(format!(
                        "Expected {} on {} to be a \"{}\" association, got \"{}\"",
                        association,
                        subject.name(),
                        kind,
                        reflection.kind,
                    ));
                }
                if let Some(expected) = &through {
                    if reflection.through.as_deref() != Some(expected.as_str()) {
                        return Verdict::fail(format!(
                            "Expected {} to go through {}, got {}",
                            association,
                            expected,
                            reflection.through.as_deref().unwrap_or("nothing"),
                        ));
                    }
                }
                Verdict::pass()
            }));
        }
        Ok(self)
    }

    /// Hand over the built cases.
    pub fn into_cases(self) -> Vec<Case> {
        self.cases
    }

    /// Drain the built cases into a sink, stopping at the first
    /// registration error.
    pub fn register_into(self, sink: &mut dyn CaseSink) -> Result<()> {
        for case in self.cases {
            sink.register(case)?;
        }
        Ok(())
    }
}

/// Sentence fragment used in generated case names for one association
/// kind. Differs from the kind's `Display` phrase in person: case names
/// read as "should …" sentences.
fn case_phrase(kind: AssociationKind) -> &'static str {
    match kind {
        AssociationKind::HasMany => "have many",
        AssociationKind::HasOne => "have one",
        AssociationKind::BelongsTo => "belong to",
        AssociationKind::HasAndBelongsToMany => "have and belong to many",
    }
}

/// Exact-element match against the attribute's error text.
fn includes(errors: &[String], message: &str) -> bool {
    errors.iter().any(|error| error == message)
}

/// Substring match against any element of the attribute's error text.
fn matches_pattern(errors: &[String], pattern: &str) -> bool {
    errors.iter().any(|error| error.contains(pattern))
}
