use std::path::PathBuf;

use db::models::task_item::{CreateTaskItem, TaskItem, UpdateTaskItem};
use ts_rs::TS;

const DEFAULT_OUTPUT: &str = "shared/types.ts";

fn generate_types_content() -> String {
    let header = "// This file was generated by `generate_types`. Do not edit it by hand.\n";
    let decls = [
        TaskItem::decl(),
        CreateTaskItem::decl(),
        UpdateTaskItem::decl(),
    ];
    let body = decls
        .iter()
        .map(|decl| format!("export {}", decl.trim()))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{header}\n{body}\n")
}

fn main() -> std::io::Result<()> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, generate_types_content())?;
    println!("Wrote TypeScript types to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_use_wire_names() {
        let content = generate_types_content();

        assert!(content.contains("export type TaskItem"));
        assert!(content.contains("export type CreateTaskItem"));
        assert!(content.contains("export type UpdateTaskItem"));
        assert!(content.contains("assignedUser: string"));
        assert!(content.contains("id: number"));
    }
}
