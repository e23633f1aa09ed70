//! The `adaptest init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create adaptest.toml
    if std::path::Path::new("adaptest.toml").exists() {
        println!("adaptest.toml already exists, skipping.");
    } else {
        std::fs::write("adaptest.toml", SAMPLE_CONFIG)?;
        println!("Created adaptest.toml");
    }

    // Create example question bank
    std::fs::create_dir_all("question-banks")?;
    let example_path = std::path::Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit adaptest.toml with your OpenRouter API key");
    println!("  2. Run: adaptest validate --bank question-banks/example.toml");
    println!("  3. Run: adaptest run --bank question-banks/example.toml");
    println!("  4. Generate your own bank: adaptest fetch --source notes.txt --output question-banks/notes.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# adaptest configuration

# OpenRouter API key, or set ADAPTEST_OPENROUTER_KEY
api_key = "${OPENROUTER_API_KEY}"
model = "openai/gpt-4.1-mini"

# Questions generated per subset
main_count = 10
buffer_count = 10
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Bank"
description = "A small example bank to get started"

[[main]]
prompt = "Which planet is closest to the sun?"
answer = "B"
difficulty = 0.3
explanation = "Mercury orbits at about 58 million km from the sun."
topic = "Astronomy"

[main.options]
A = "Venus"
B = "Mercury"
C = "Mars"
D = "Earth"

[[main]]
prompt = "What is the chemical symbol for gold?"
answer = "C"
difficulty = 0.5
explanation = "Au comes from the Latin aurum."
topic = "Chemistry"

[main.options]
A = "Gd"
B = "Go"
C = "Au"
D = "Ag"

[[main]]
prompt = "Which data structure gives O(1) average lookups by key?"
answer = "A"
difficulty = 0.6
explanation = "Hash tables trade memory for constant-time access."
topic = "Computer Science"

[main.options]
A = "hash table"
B = "linked list"
C = "binary tree"
D = "stack"

[[buffer]]
prompt = "How many continents are there?"
answer = "D"
difficulty = 0.2
explanation = "The usual count is seven."
topic = "Geography"

[buffer.options]
A = "four"
B = "five"
C = "six"
D = "seven"

[[buffer]]
prompt = "What is the time complexity of binary search?"
answer = "B"
difficulty = 0.8
explanation = "Each step halves the search interval."
topic = "Computer Science"

[buffer.options]
A = "O(n)"
B = "O(log n)"
C = "O(n log n)"
D = "O(1)"
"#;
