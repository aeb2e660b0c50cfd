slot_policy!(
    ///
    /// Any
    ///
    /// Keeps the first value seen. Once populated the state is final, which
    /// lets batch processing stop early.
    ///
    Any,
    Any,
    change_first_time,
    change_first_time_from,
    FirstTime
);

slot_policy!(
    ///
    /// AnyLast
    ///
    /// Keeps the most recent value; a populated merge source always wins.
    ///
    AnyLast,
    AnyLast,
    change_every_time,
    change_every_time_from,
    EveryTime
);
