//! Arithmetic tools.

use super::{ArgSpec, InputSchema, McpTool, ToolArguments};
use crate::formatters::{ResultCard, display_number};

const COMPUTED_AT: &str = "Computed at";

fn operands(first: &'static str, first_desc: &'static str, second: &'static str, second_desc: &'static str) -> InputSchema {
    InputSchema::new()
        .arg(ArgSpec::number(first, first_desc).required())
        .arg(ArgSpec::number(second, second_desc).required())
}

fn success(title: &str, operation: String, result: f64) -> String {
    ResultCard::new(title)
        .line("Operation", operation)
        .line("Result", display_number(result))
        .timestamp(COMPUTED_AT)
        .render()
}

fn failure(title: &str, operation: String, error: &str) -> String {
    ResultCard::new(title).line("Operation", operation).line("Error", error).timestamp(COMPUTED_AT).render()
}

fn pair(args: &ToolArguments, first: &str, second: &str) -> (f64, f64) {
    (args.number(first).unwrap_or_default(), args.number(second).unwrap_or_default())
}

fn infix(a: f64, op: &str, b: f64) -> String {
    format!("{} {op} {}", display_number(a), display_number(b))
}

/// `a + b`.
pub struct AddTool;

#[async_trait::async_trait]
impl McpTool for AddTool {
    fn name(&self) -> &'static str {
        "add"
    }

    fn description(&self) -> &'static str {
        "Add two numbers together (a + b)"
    }

    fn input_schema(&self) -> InputSchema {
        operands("a", "First number", "b", "Second number")
    }

    async fn execute(&self, args: &ToolArguments) -> String {
        let (a, b) = pair(args, "a", "b");
        success("Calculation: Addition", infix(a, "+", b), a + b)
    }
}

/// `a - b`.
pub struct SubtractTool;

#[async_trait::async_trait]
impl McpTool for SubtractTool {
    fn name(&self) -> &'static str {
        "subtract"
    }

    fn description(&self) -> &'static str {
        "Subtract two numbers (a - b)"
    }

    fn input_schema(&self) -> InputSchema {
        operands("a", "First number", "b", "Number to subtract")
    }

    async fn execute(&self, args: &ToolArguments) -> String {
        let (a, b) = pair(args, "a", "b");
        success("Calculation: Subtraction", infix(a, "-", b), a - b)
    }
}

/// `a × b`.
pub struct MultiplyTool;

#[async_trait::async_trait]
impl McpTool for MultiplyTool {
    fn name(&self) -> &'static str {
        "multiply"
    }

    fn description(&self) -> &'static str {
        "Multiply two numbers (a × b)"
    }

    fn input_schema(&self) -> InputSchema {
        operands("a", "First number", "b", "Second number")
    }

    async fn execute(&self, args: &ToolArguments) -> String {
        let (a, b) = pair(args, "a", "b");
        success("Calculation: Multiplication", infix(a, "×", b), a * b)
    }
}

/// `a ÷ b`; a zero divisor is reported in the text.
pub struct DivideTool;

#[async_trait::async_trait]
impl McpTool for DivideTool {
    fn name(&self) -> &'static str {
        "divide"
    }

    fn description(&self) -> &'static str {
        "Divide two numbers (a ÷ b)"
    }

    fn input_schema(&self) -> InputSchema {
        operands("a", "Dividend (number to divide)", "b", "Divisor (number to divide by)")
    }

    async fn execute(&self, args: &ToolArguments) -> String {
        let (a, b) = pair(args, "a", "b");
        let title = "Calculation: Division";
        if b == 0.0 {
            return failure(title, infix(a, "÷", b), "Division by zero is undefined");
        }
        success(title, infix(a, "÷", b), a / b)
    }
}

/// `base ^ exponent`.
pub struct PowerTool;

#[async_trait::async_trait]
impl McpTool for PowerTool {
    fn name(&self) -> &'static str {
        "power"
    }

    fn description(&self) -> &'static str {
        "Calculate power of a number (base^exponent)"
    }

    fn input_schema(&self) -> InputSchema {
        operands("base", "Base number", "exponent", "Exponent")
    }

    async fn execute(&self, args: &ToolArguments) -> String {
        let (base, exponent) = pair(args, "base", "exponent");
        let operation = format!("{}^{}", display_number(base), display_number(exponent));
        success("Calculation: Power", operation, base.powf(exponent))
    }
}

/// Square root; negative input is reported in the text.
pub struct SqrtTool;

#[async_trait::async_trait]
impl McpTool for SqrtTool {
    fn name(&self) -> &'static str {
        "sqrt"
    }

    fn description(&self) -> &'static str {
        "Calculate square root of a number"
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new().arg(ArgSpec::number("number", "Number to calculate square root of").required())
    }

    async fn execute(&self, args: &ToolArguments) -> String {
        let number = args.number("number").unwrap_or_default();
        let title = "Calculation: Square Root";
        let operation = format!("√{}", display_number(number));
        if number < 0.0 {
            return failure(title, operation, "Square root of a negative number is undefined");
        }
        success(title, operation, number.sqrt())
    }
}
