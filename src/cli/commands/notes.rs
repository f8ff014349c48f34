//! Note command handlers

use crate::api::NoteDto;
use crate::cli::{NoteCommands, ServerArgs};
use crate::clients::NoteInput;

fn print_note(note: &NoteDto) {
    println!("{} [{}]", note.title, note.id);
    println!("  Created: {} | Updated: {}", note.created_at, note.updated_at);
    if let Some(text) = &note.text {
        println!();
        for line in text.lines() {
            println!("  {line}");
        }
    }
}

pub async fn cmd_notes(server: &ServerArgs, command: NoteCommands) -> anyhow::Result<()> {
    let client = super::logged_in_client(server).await?;

    match command {
        NoteCommands::List => {
            let notes = client.fetch_notes().await?;
            if notes.is_empty() {
                println!("No notes yet.");
                println!();
                println!("Add one with: notekeeper notes -u <user> -p <pass> add \"title\"");
            } else {
                println!("Notes ({} total)", notes.len());
                println!("{:-<70}", "");
                for note in &notes {
                    println!("• {} [{}]", note.title, note.id);
                }
            }
        }
        NoteCommands::Show { id } => {
            let note = client.fetch_note(&id).await?;
            print_note(&note);
        }
        NoteCommands::Add { title, text } => {
            let note = client.create_note(&NoteInput { title, text }).await?;
            println!("✓ Created note {}", note.id);
        }
        NoteCommands::Edit { id, title, text } => {
            let note = client.update_note(&id, &NoteInput { title, text }).await?;
            println!("✓ Updated note {}", note.id);
            print_note(&note);
        }
        NoteCommands::Delete { id } => {
            client.delete_note(&id).await?;
            println!("✓ Deleted note {id}");
        }
    }

    client.logout().await?;
    Ok(())
}
