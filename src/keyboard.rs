use itertools::Itertools;

/// Rows of the on-screen keyboard, top to bottom (unshifted US layout)
pub const KEYBOARD_ROWS: [&[char]; 4] = [
    &['`', '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '-', '='],
    &['q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p', '[', ']', '\\'],
    &['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l', ';', '\''],
    &['z', 'x', 'c', 'v', 'b', 'n', 'm', ',', '.', '/'],
];

/// Every key of the layout once, in row order. Used by the "all" drill.
pub fn all_keys() -> Vec<char> {
    KEYBOARD_ROWS
        .iter()
        .flat_map(|row| row.iter().copied())
        .unique()
        .collect()
}

/// Case-insensitive key identity; the keyboard only shows lowercase caps
pub fn normalize(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
