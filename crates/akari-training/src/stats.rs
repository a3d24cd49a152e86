/// Mean and maximum of a population-wide quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The maximum value in the dataset.
    pub max: f64,
}

impl Summary {
    /// Summarizes `values`, or returns `None` if there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// # use akari_training::stats::Summary;
    /// let summary = Summary::new([0.5, 0.25, 0.75]).unwrap();
    /// assert_eq!(summary.mean, 0.5);
    /// assert_eq!(summary.max, 0.75);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0_u32;
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            count += 1;
            sum += value;
            max = max.max(value);
        }
        (count > 0).then(|| Self {
            mean: sum / f64::from(count),
            max,
        })
    }
}
