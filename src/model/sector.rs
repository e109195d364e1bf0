open_string_enum! {
    /// Economic sector a company operates in. Open set: unknown tags become `Custom`.
    pub enum Sector("sector") {
        Housing => "housing",
        Construction => "construction",
        Food => "food",
        Technology => "technology",
        Healthcare => "healthcare",
        Finance => "finance",
    }
}

string_enum! {
    /// Ideological axis shared by parties (a single bias) and segments (a weight per bias).
    pub enum IdeologicalBias {
        Left => "left",
        CenterLeft => "center_left",
        Center => "center",
        CenterRight => "center_right",
        Right => "right",
    }
}
