//! The `eysh init` command.

use std::path::Path;

use anyhow::Result;

fn write_once(path: &str, content: &str) -> Result<()> {
    let path = Path::new(path);
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

pub fn execute() -> Result<()> {
    write_once("eysh.toml", SAMPLE_CONFIG)?;
    write_once("question-banks/diagnostic.toml", EXAMPLE_BANK)?;
    write_once("sessions/example.json", EXAMPLE_SESSION)?;

    println!("\nNext steps:");
    println!("  1. Point [models] in eysh.toml at your trained artifacts (optional)");
    println!("  2. Run: eysh validate --bank question-banks/diagnostic.toml");
    println!(
        "  3. Run: eysh roadmap --session sessions/example.json --bank question-banks --format all"
    );

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# eysh configuration

locale = "mn"
default_weeks_available = 12
default_target_score = 700
output_dir = "./eysh-reports"

# Pretrained model artifacts. Missing models fall back to rule-based strategies.
[models]
type = "local"
dir = "./models"

# [models]
# type = "http"
# base_url = "https://models.example.com/eysh"
# api_token = "${EYSH_MODELS_TOKEN}"
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "diagnostic"
name = "Diagnostic Test"
description = "Short placement test covering the core math topics"
subject = "math"

[[questions]]
id = "alg-1"
topic = "algebra"
difficulty = 1
content = "Solve 2x + 3 = 7."
options = ["1", "2", "3", "4"]
correct_answer = 1
explanation = "2x = 4, so x = 2."

[[questions]]
id = "alg-2"
topic = "algebra"
difficulty = 3
content = "Find the sum of the roots of x^2 - 5x + 6 = 0."
options = ["-5", "5", "6", "-6"]
correct_answer = 1

[[questions]]
id = "geo-1"
topic = "geometry"
difficulty = 2
content = "A right triangle has legs 3 and 4. How long is the hypotenuse?"
options = ["5", "6", "7", "12"]
correct_answer = 0

[[questions]]
id = "trig-1"
topic = "trigonometry"
difficulty = 2
content = "What is sin(30°)?"
options = ["0", "1/2", "√2/2", "1"]
correct_answer = 1

[[questions]]
id = "prob-1"
topic = "probability"
difficulty = 2
content = "A fair die is rolled once. What is the probability of an even number?"
options = ["1/6", "1/3", "1/2", "2/3"]
correct_answer = 2

[[questions]]
id = "calc-1"
topic = "calculus"
difficulty = 3
content = "What is the derivative of x^3?"
options = ["x^2", "3x^2", "3x", "x^3/3"]
correct_answer = 1

[[questions]]
id = "seq-1"
topic = "sequences"
difficulty = 2
content = "The arithmetic sequence 2, 5, 8, ... What is the 10th term?"
options = ["29", "30", "32", "27"]
correct_answer = 0

[[questions]]
id = "vec-1"
topic = "vectors"
difficulty = 3
content = "What is the length of the vector (3, 4)?"
options = ["5", "7", "1", "12"]
correct_answer = 0
"#;

const EXAMPLE_SESSION: &str = r#"{
  "user_id": "student-1",
  "answers": [
    { "question_id": "alg-1", "answer": 1, "time_spent": 35 },
    { "question_id": "alg-2", "answer": 0, "time_spent": 80 },
    { "question_id": "geo-1", "answer": 0, "time_spent": 40 },
    { "question_id": "trig-1", "answer": 3, "time_spent": 55 },
    { "question_id": "prob-1", "answer": 2, "time_spent": 30 },
    { "question_id": "calc-1", "answer": 0, "time_spent": 90 },
    { "question_id": "seq-1", "answer": 0, "time_spent": 45 },
    { "question_id": "vec-1", "answer": 2, "time_spent": 70 }
  ]
}
"#;
