//! Prompt templates seeded from the session settings.

use crate::tools::ALL_TOOLS;

use super::session::SessionSettings;

/// Build the system prompt for a trading session.
pub fn build_system_prompt(settings: &SessionSettings) -> String {
    let tool_descriptions = ALL_TOOLS
        .iter()
        .map(|tool| format!("- **{}**: {}", tool.name(), tool.description()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a trading assistant managing a brokerage account on the user's behalf.

## Your Tools

{tool_descriptions}

## Session

- Available capital: ${capital}
- Daily profit target: ${profit_target}

## Rules and Guidelines

1. **Check before acting** - Fetch account state with callBrokerage (path /v2/account) before committing capital.
2. **Use real data** - Fetch prices through your tools before quoting them; never invent quotes, fills, or balances.
3. **Placing orders** - Use callBrokerage with path /v2/orders, method POST, and a JSON body.
4. **Report what happened** - Summarize every call you made and its outcome in your reply.
5. **Handle errors gracefully** - If a tool result contains an error, explain it to the user rather than retrying blindly."#,
        tool_descriptions = tool_descriptions,
        capital = settings.capital,
        profit_target = settings.profit_target,
    )
}

/// Opening assistant greeting, restating the session parameters.
pub fn initial_greeting(settings: &SessionSettings) -> String {
    format!(
        "Hello! I'm your trading assistant. You have ${} in capital and a daily profit target of ${}. What would you like to do?",
        settings.capital, settings.profit_target,
    )
}
