//! The `quizroom init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizroom.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("challenge")?;
    write_if_missing(Path::new("challenge/challenge_page1.json"), SAMPLE_PAGE)?;
    write_if_missing(Path::new("quiz.json"), SAMPLE_QUIZ)?;

    println!("\nNext steps:");
    println!("  1. Add pages as challenge/challenge_page2.json, challenge_page3.json, ...");
    println!("  2. Run: quizroom validate --bank challenge");
    println!("  3. Run: quizroom play");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizroom configuration

bank = "challenge"
quiz = "quiz.json"
dashboard_url = "http://localhost:5000/dashboard"

# Uncomment to send results when a run completes (`quizroom play --report`).
# QUIZROOM_ENDPOINT overrides base_url.
# [reporter]
# base_url = "http://localhost:5000"
# path = "/action_reaction"
# timeout_secs = 30
"#;

const SAMPLE_PAGE: &str = r#"{
  "title": "The Formation Lab",
  "description": "Disinfection keeps water safe, but the chemistry does not stop there.",
  "questions": [
    {
      "question": "Which disinfectant is most commonly linked to THM formation?",
      "options": ["Chlorine", "Ozone", "UV light"],
      "correct_answer": "Chlorine",
      "explanation": "Free chlorine reacts with natural organic matter to form THMs.",
      "learning_content": "Chlorine plus organic matter is the classic recipe for THMs.",
      "Clue": "It is the smell you notice at a swimming pool."
    }
  ]
}
"#;

const SAMPLE_QUIZ: &str = r#"[
  {
    "id": "1",
    "question": "Ozonating water that contains bromide can form which byproduct?",
    "options": ["Chloroform", "Bromate", "Chlorite"],
    "correct_answer": "Bromate",
    "explanation": "Ozone oxidises bromide to bromate."
  }
]
"#;
