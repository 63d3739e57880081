//! Generated cases, registration, and suite reporting.

use std::fmt;

use crate::error::{ModelSpecError, Result, Verdict};

type CaseBody = Box<dyn Fn() -> Verdict>;

/// A named, executable check case.
///
/// The body is a zero-argument closure over the subject class and rule
/// specification; it runs nothing until the owner of the registered case
/// decides to. One case checks one attribute, value, or association.
pub struct Case {
    name: String,
    body: CaseBody,
}

impl Case {
    /// Create a case from a name and a body.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> Verdict + 'static,
    {
        Case {
            name: name.into(),
            body: Box::new(body),
        }
    }

    /// The human-readable case name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute the case body.
    pub fn run(&self) -> Verdict {
        (self.body)()
    }
}

impl fmt::Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case").field("name", &self.name).finish()
    }
}

/// Accepts generated cases for later execution.
///
/// This is the registration seam: generators hand cases over explicitly
/// and never execute them during generation.
pub trait CaseSink {
    fn register(&mut self, case: Case) -> Result<()>;
}

/// Stock sink that stores cases and runs them in registration order.
pub struct CaseRegistry {
    suite: String,
    cases: Vec<Case>,
}

impl CaseRegistry {
    /// An empty registry for the named suite.
    pub fn new(suite: impl Into<String>) -> Self {
        CaseRegistry {
            suite: suite.into(),
            cases: Vec::new(),
        }
    }

    /// Number of registered cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Names of the registered cases, in registration order.
    pub fn case_names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(Case::name)
    }

    /// Run every case and collect the verdicts into a report.
    ///
    /// Cases are independent: a failure is recorded and the remaining
    /// cases still run.
    pub fn run_all(&self) -> SuiteReport {
        let outcomes = self
            .cases
            .iter()
            .map(|case| (case.name().to_string(), case.run()))
            .collect();
        SuiteReport {
            suite: self.suite.clone(),
            outcomes,
        }
    }
}

impl CaseSink for CaseRegistry {
    /// Register a case, rejecting duplicate names loudly.
    fn register(&mut self, case: Case) -> Result<()> {
        if self.cases.iter().any(|c| c.name == case.name) {
            return Err(ModelSpecError::DuplicateCase { name: case.name });
        }
        self.cases.push(case);
        Ok(())
    }
}

/// Results of running every case in a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    suite: String,
    outcomes: Vec<(String, Verdict)>,
}

impl SuiteReport {
    /// The suite name this report belongs to.
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Number of cases that ran.
    pub fn cases_run(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether every case passed.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|(_, v)| v.is_pass())
    }

    /// The failing cases as (name, message) pairs.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(name, verdict)| {
                verdict.message().map(|message| (name.as_str(), message))
            })
            .collect()
    }

    /// Panic with the rendered report unless every case passed.
    ///
    /// This is the bridge into the host test runner: one test function
    /// owns a whole generated suite and fails with the full breakdown.
    pub fn assert_all_passed(&self) {
        if !self.passed() {
            panic!("{}", self);
        }
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "━━━ {} ━━━", self.suite)?;
        for (name, verdict) in &self.outcomes {
            match verdict {
                Verdict::Pass => writeln!(f, "  ✓ {}", name)?,
                Verdict::Fail { message } => {
                    writeln!(f, "  ✗ {}", name)?;
                    writeln!(f, "      {}", message)?;
                }
            }
        }
        let passed = self.outcomes.iter().filter(|(_, v)| v.is_pass()).count();
        write!(f, "  {} of {} cases passed.", passed, self.outcomes.len())
    }
}
