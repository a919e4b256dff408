//! Plain-text rendering of the users table

use crate::models::User;

const HEADERS: [&str; 5] = ["ID", "PHONE", "EMAIL", "NAME", "ROLE"];

/// Render `users` as an aligned table; missing id and name render empty
pub fn render(users: &[User]) -> String {
    let rows: Vec<[String; 5]> = users
        .iter()
        .map(|u| {
            [
                u.id.map(|id| id.to_string()).unwrap_or_default(),
                u.phone.clone(),
                u.email.clone(),
                u.name.clone().unwrap_or_default(),
                u.role.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, HEADERS.map(str::to_string).as_slice(), &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let users = vec![
            User {
                id: Some(1),
                phone: "600111222".into(),
                email: "ana@example.com".into(),
                name: Some("Ana".into()),
                role: "admin".into(),
            },
            User {
                id: None,
                phone: "7".into(),
                email: "b@x.io".into(),
                name: None,
                role: "user".into(),
            },
        ];

        let table = render(&users);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID  PHONE      EMAIL            NAME  ROLE");
        assert_eq!(lines[1], "1   600111222  ana@example.com  Ana   admin");
        assert_eq!(lines[2], "    7          b@x.io                 user");
    }

    #[test]
    fn test_render_empty_has_header_only() {
        assert_eq!(render(&[]), "ID  PHONE  EMAIL  NAME  ROLE\n");
    }
}
