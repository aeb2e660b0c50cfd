slot_policy!(
    ///
    /// Min
    ///
    /// Keeps the smallest value seen; ties keep the value written first.
    ///
    Min,
    Min,
    change_if_less,
    change_if_less_from,
    Less
);

slot_policy!(
    ///
    /// Max
    ///
    /// Keeps the largest value seen; ties keep the value written first.
    ///
    Max,
    Max,
    change_if_greater,
    change_if_greater_from,
    Greater
);
