/// Category labels in the exact order the model was trained with.
///
/// The position of a label is the class id the model emits for it.
/// Reordering this list without retraining the model silently mislabels
/// every decision; nothing at runtime can detect the mismatch.
pub const HERB_CLASSES: [&str; 6] = [
    "Variegated Mexican Mint",
    "Java Pennywort",
    "Mexican Mint",
    "Green Chiretta",
    "Java Tea",
    "Chinese Gynura",
];

/// Returned whenever no category clears the classification threshold.
pub const NOT_A_HERB: &str = "Not a Herb";
