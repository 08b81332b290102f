use std::io::Read;

use edifact_core::EdifactParser;

fn main() {
    let mut input = Vec::new();
    std::io::stdin().read_to_end(&mut input).unwrap();

    match EdifactParser::new().parse_to_events(&input[..]) {
        Ok(events) => {
            for event in events {
                eprintln!("EVENT: {:?}", event);
            }
        }
        Err(err) => eprintln!("ERROR: {}", err),
    }
}
