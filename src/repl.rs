//! Interactive question loop.

use std::io::{self, BufRead, Write};

use crate::core::errors::DocqaError;
use crate::rag::RagPipeline;

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "q"];

/// Read questions from stdin until EOF or an exit word, answering each
/// through the pipeline. A failed answer is logged and the loop
/// continues.
pub async fn run(pipeline: &RagPipeline) -> Result<(), DocqaError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Ask questions about the document. Type 'exit' to quit.");
    loop {
        print!("question> ");
        stdout.flush()?;

        let mut line = String::new();
        let bytes = stdin.lock().read_line(&mut line)?;
        if bytes == 0 {
            break;
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&question.to_lowercase().as_str()) {
            break;
        }

        match pipeline.ask(question).await {
            Ok(answer) => println!("\n{}\n", answer),
            Err(e) => {
                tracing::error!("failed to answer question: {}", e);
                println!("\nSomething went wrong answering that, try again.\n");
            }
        }
    }

    Ok(())
}
