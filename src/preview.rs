use crate::display::{Icon, RenderPlan};
use anyhow::Result;
use crossterm::style::{self, Attribute, Color};
use crossterm::queue;
use regex::Regex;
use std::io::Write;

/// Prints a render plan as a terminal "cell".  Stands in for a real view; it reads nothing but the
/// plan.
pub fn render_plan<W: Write>(out: &mut W, plan: &RenderPlan, width: usize) -> Result<()> {
    if let Some(annotation) = &plan.retweet_annotation {
        queue!(out, style::SetForegroundColor(Color::DarkGrey))?;
        queue!(out, style::Print(format!("⟲ {annotation}\r\n")))?;
        queue!(out, style::ResetColor)?;
    }

    queue!(out, style::SetAttribute(Attribute::Bold))?;
    queue!(out, style::Print(&plan.name))?;
    queue!(out, style::SetAttribute(Attribute::Reset))?;
    queue!(out, style::SetForegroundColor(Color::DarkCyan))?;
    queue!(out, style::Print(format!(" {}", plan.screen_name)))?;
    queue!(out, style::SetForegroundColor(Color::DarkGrey))?;
    queue!(out, style::Print(format!("  {}\r\n", plan.age)))?;
    queue!(out, style::ResetColor)?;

    for line in body_lines(&plan.body, width) {
        queue!(out, style::Print(format!("{line}\r\n")))?;
    }

    let counts = format!(
        "[{}] {}   [{}] {}\r\n",
        plan.icon_asset(Icon::Retweet),
        plan.retweet_count,
        plan.icon_asset(Icon::Favorite),
        plan.favorite_count,
    );
    queue!(out, style::SetForegroundColor(Color::DarkGrey))?;
    queue!(out, style::Print(counts))?;
    queue!(out, style::ResetColor)?;

    out.flush()?;
    Ok(())
}

fn body_lines(body: &str, width: usize) -> Vec<String> {
    let re_newlines = Regex::new(r"[\r\n]+").unwrap();
    let formatted = re_newlines.replace_all(body, "⏎ ");
    textwrap::wrap(&formatted, width.max(1))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}
