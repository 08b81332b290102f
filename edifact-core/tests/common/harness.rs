//! Test harness for running fixtures with stochastic dialect variations

use std::cell::RefCell;
use std::rc::Rc;

use edifact_core::{
    Delimiters, EdifactParser, Event, MessageListener, ParserOptions, Source, Symbol, Transcoder,
    ROOT_ELEMENT,
};

use crate::common::{ExpectedEvent, Gen, TestCase};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: String,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Listener recording `start X` / `end X` lines into a shared log
#[derive(Clone, Default)]
pub struct Log(pub Rc<RefCell<Vec<String>>>);

impl Log {
    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl MessageListener for Log {
    fn message_started(&mut self, message_type: &str) {
        self.0.borrow_mut().push(format!("start {}", message_type));
    }

    fn message_ended(&mut self, message_type: &str) {
        self.0.borrow_mut().push(format!("end {}", message_type));
    }
}

/// Parse with the given options, recording events and listener calls
pub fn parse_events(
    input: &str,
    options: ParserOptions,
) -> (edifact_core::Result<Vec<Event>>, Vec<String>) {
    let log = Log::default();
    let mut parser = EdifactParser::new().with_options(options);
    parser.set_listener(log.clone());
    let result = parser.parse_to_events(input);
    (result, log.entries())
}

/// Format one event (no collapsing)
pub fn format_event(event: &Event) -> String {
    match event {
        Event::DocumentStart => "DocumentStart".to_string(),
        Event::DocumentEnd => "DocumentEnd".to_string(),
        Event::ElementStart { name, .. } => format!("<{}", name),
        Event::ElementEnd { name } => format!("{}>", name),
        Event::Characters(text) => format!("Text {:?}", text),
    }
}

/// Format the events inside the root element for comparison.
///
/// A leaf element with its text collapses to `NAME = text`; an empty leaf
/// to `NAME =`.
pub fn format_events(events: &[Event]) -> Vec<String> {
    let inner: Vec<&Event> = events
        .iter()
        .filter(|e| !matches!(e, Event::DocumentStart | Event::DocumentEnd))
        .filter(|e| e.element_name() != Some(ROOT_ELEMENT))
        .collect();

    let mut out = Vec::new();
    let mut i = 0;
    while i < inner.len() {
        match (inner[i], inner.get(i + 1), inner.get(i + 2)) {
            (
                Event::ElementStart { name, .. },
                Some(Event::Characters(text)),
                Some(Event::ElementEnd { name: end }),
            ) if name == end => {
                out.push(format!("{} = {}", name, text));
                i += 3;
            }
            (Event::ElementStart { name, .. }, Some(Event::ElementEnd { name: end }), _)
                if name == end =>
            {
                out.push(format!("{} =", name));
                i += 2;
            }
            (event, _, _) => {
                out.push(format_event(event));
                i += 1;
            }
        }
    }
    out
}

/// Format expected event for comparison
fn format_expected(event: &ExpectedEvent) -> String {
    match event {
        ExpectedEvent::Bare(name) => name.clone(),
        ExpectedEvent::WithContent(name, content) => format!("{} {:?}", name, content),
    }
}

/// Check that events form one tree rooted at the interchange element.
pub fn check_well_formed(events: &[Event]) -> Result<(), String> {
    if events.first() != Some(&Event::DocumentStart) {
        return Err("first event is not DocumentStart".to_string());
    }
    if events.last() != Some(&Event::DocumentEnd) {
        return Err("last event is not DocumentEnd".to_string());
    }
    let body = &events[1..events.len() - 1];
    let mut stack: Vec<&str> = Vec::new();
    for (i, event) in body.iter().enumerate() {
        match event {
            Event::ElementStart { name, .. } => {
                if stack.is_empty() && i != 0 {
                    return Err(format!("second root element {} at {}", name, i));
                }
                if stack.is_empty() && name.as_str() != ROOT_ELEMENT {
                    return Err(format!("root element is {}", name));
                }
                stack.push(name.as_str());
            }
            Event::ElementEnd { name } => match stack.pop() {
                Some(open) if open == name.as_str() => {}
                Some(open) => return Err(format!("{} closed while {} is open", name, open)),
                None => return Err(format!("{} closed with nothing open", name)),
            },
            Event::Characters(text) => {
                if stack.is_empty() {
                    return Err(format!("text {:?} outside the root", text));
                }
            }
            other => return Err(format!("unexpected {:?} inside the document", other)),
        }
    }
    if stack.is_empty() {
        Ok(())
    } else {
        Err(format!("unclosed elements {:?}", stack))
    }
}

/// Compare one parse against the fixture's expectations
fn check(case: &TestCase, input: String, seed: u64) -> TestResult {
    let (result, log) = parse_events(&input, ParserOptions::default());
    let expected: Vec<String> = case.events.iter().map(format_expected).collect();
    let mut errors = Vec::new();

    let actual = match result {
        Ok(events) => {
            if let Err(e) = check_well_formed(&events) {
                errors.push(format!("Not well formed: {}", e));
            }
            format_events(&events)
        }
        Err(e) => {
            errors.push(format!("Parse failed: {}", e));
            Vec::new()
        }
    };

    if actual.len() != expected.len() {
        errors.push(format!(
            "Event count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }
    for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
        if act != exp {
            errors.push(format!("Event {}: expected '{}', got '{}'", i, exp, act));
        }
    }
    if !case.listener.is_empty() && log != case.listener {
        errors.push(format!("Listener: expected {:?}, got {:?}", case.listener, log));
    }

    TestResult {
        passed: errors.is_empty(),
        input,
        expected,
        actual,
        seed,
        errors,
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    check(case, case.edifact.clone(), 0)
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - 50% chance of a custom delimiter set declared by UNA
/// - otherwise 30% chance of a standard UNA
/// - geometric leading whitespace (α=0.5)
/// - random line breaks after segment terminators
///
/// None of these may change the event stream.
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let delimiters = if gen.chance(0.5) {
        Some(gen.custom_delimiters())
    } else if gen.chance(0.3) {
        Some(Delimiters::STANDARD)
    } else {
        None
    };

    let mut input = " ".repeat(gen.geometric(0.5));
    input.push_str(&to_dialect(&case.edifact, delimiters, gen));
    check(case, input, gen.seed)
}

/// Re-encode a standard-syntax interchange in another dialect.
///
/// With `Some(delimiters)` a UNA preamble declares the set and every symbol
/// is rendered with it; with `None` the standard syntax is kept without a
/// preamble. Line breaks after terminators are drawn from `gen`.
pub fn to_dialect(standard: &str, delimiters: Option<Delimiters>, gen: &mut Gen) -> String {
    let source = Source::from(standard).open().expect("text source");
    let transcoder = Transcoder::new(source, 256).expect("standard interchange");
    let d = delimiters.unwrap_or(Delimiters::STANDARD);
    let escape = d.escape.expect("dialect with a release character");

    let mut out = String::new();
    if delimiters.is_some() {
        out.push_str("UNA");
        out.push(d.component);
        out.push(d.data);
        out.push(d.decimal);
        out.push(escape);
        out.push(d.repetition.unwrap_or(' '));
        out.push(d.segment);
    }
    for symbol in transcoder {
        match symbol.expect("readable text") {
            Symbol::Char(c) | Symbol::Escaped(c) => {
                if d.is_escapable(c) {
                    out.push(escape);
                }
                out.push(c);
            }
            Symbol::ComponentSeparator => out.push(d.component),
            Symbol::DataSeparator => out.push(d.data),
            Symbol::RepetitionSeparator => out.push(d.repetition.expect("repetition in use")),
            Symbol::SegmentTerminator => out.push(d.segment),
            Symbol::LineBreak => out.push_str(gen.line_break()),
        }
    }
    out
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set EDIFACT_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nInput:");
        eprintln!("{}", self.input);
        eprintln!("\nExpected events:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual events:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
