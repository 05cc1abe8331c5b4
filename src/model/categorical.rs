//! Dictionary-encoded string columns

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

use crate::error::{Result, ShrinkError};

/// Per-row dictionary codes, stored in the narrowest width that can index
/// the category list. `-1` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryCodes {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
}

impl CategoryCodes {
    /// Pack codes into the narrowest width for `category_count` categories
    fn pack(codes: Vec<i32>, category_count: usize) -> Self {
        if category_count < i8::MAX as usize {
            CategoryCodes::Int8(codes.into_iter().map(|c| c as i8).collect())
        } else if category_count < i16::MAX as usize {
            CategoryCodes::Int16(codes.into_iter().map(|c| c as i16).collect())
        } else {
            CategoryCodes::Int32(codes)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CategoryCodes::Int8(v) => v.len(),
            CategoryCodes::Int16(v) => v.len(),
            CategoryCodes::Int32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Code at `row`, or `None` for a missing value
    pub fn get(&self, row: usize) -> Option<usize> {
        let code = match self {
            CategoryCodes::Int8(v) => v.get(row).map(|&c| c as i32),
            CategoryCodes::Int16(v) => v.get(row).map(|&c| c as i32),
            CategoryCodes::Int32(v) => v.get(row).copied(),
        }?;
        usize::try_from(code).ok()
    }

    /// Bytes per code
    pub fn byte_width(&self) -> usize {
        match self {
            CategoryCodes::Int8(_) => 1,
            CategoryCodes::Int16(_) => 2,
            CategoryCodes::Int32(_) => 4,
        }
    }
}

/// A categorical column: distinct values plus per-row codes into them
#[derive(Debug, Clone, PartialEq)]
pub struct Categorical {
    categories: Vec<Box<str>>,
    codes: CategoryCodes,
}

impl Categorical {
    /// Dictionary-encode a sequence of optional strings.
    ///
    /// Categories keep first-seen order; row order is untouched.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut dictionary: IndexSet<&'a str, FxBuildHasher> = IndexSet::default();
        let codes: Vec<i32> = values
            .into_iter()
            .map(|value| match value {
                Some(s) => dictionary.insert_full(s).0 as i32,
                None => -1,
            })
            .collect();

        let categories: Vec<Box<str>> = dictionary.into_iter().map(Box::from).collect();
        let codes = CategoryCodes::pack(codes, categories.len());
        Self { categories, codes }
    }

    /// Build from an existing dictionary, checking every code is in range
    pub fn try_new(column: &str, categories: Vec<Box<str>>, codes: CategoryCodes) -> Result<Self> {
        for row in 0..codes.len() {
            if let Some(code) = codes.get(row) {
                if code >= categories.len() {
                    return Err(ShrinkError::InvalidCategoryCode {
                        column: column.to_string(),
                        code: code as i64,
                        categories: categories.len(),
                    });
                }
            }
        }
        Ok(Self { categories, codes })
    }

    pub fn categories(&self) -> &[Box<str>] {
        &self.categories
    }

    pub fn codes(&self) -> &CategoryCodes {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Decoded value at `row`
    pub fn get(&self, row: usize) -> Option<&str> {
        self.codes
            .get(row)
            .and_then(|code| self.categories.get(code))
            .map(|c| &**c)
    }

    /// Iterate decoded values in row order
    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        (0..self.len()).map(move |row| self.get(row))
    }

    /// Codes plus one boxed slot and the UTF-8 bytes per category
    pub fn memory_usage(&self) -> usize {
        let dictionary: usize = self
            .categories
            .iter()
            .map(|c| std::mem::size_of::<Box<str>>() + c.len())
            .sum();
        self.codes.len() * self.codes.byte_width() + dictionary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_dedups_and_keeps_rows() {
        let cat = Categorical::from_values(["a", "b", "a", "c"].iter().map(|s| Some(*s)));
        let categories: Vec<&str> = cat.categories().iter().map(|c| &**c).collect();
        assert_eq!(categories, vec!["a", "b", "c"]);
        assert_eq!(cat.len(), 4);
        let decoded: Vec<_> = cat.iter().collect();
        assert_eq!(decoded, vec![Some("a"), Some("b"), Some("a"), Some("c")]);
        assert!(matches!(cat.codes(), CategoryCodes::Int8(_)));
    }

    #[test]
    fn test_missing_values_use_negative_code() {
        let cat = Categorical::from_values(vec![Some("x"), None, Some("x")]);
        assert_eq!(cat.categories().len(), 1);
        assert_eq!(cat.get(1), None);
        assert_eq!(cat.codes(), &CategoryCodes::Int8(vec![0, -1, 0]));
    }

    #[test]
    fn test_code_width_grows_with_cardinality() {
        let values: Vec<String> = (0..200).map(|i| format!("v{i}")).collect();
        let cat = Categorical::from_values(values.iter().map(|s| Some(s.as_str())));
        assert!(matches!(cat.codes(), CategoryCodes::Int16(_)));
        assert_eq!(cat.get(199), Some("v199"));
    }

    #[test]
    fn test_try_new_rejects_out_of_range_codes() {
        let err = Categorical::try_new(
            "site",
            vec![Box::from("a")],
            CategoryCodes::Int8(vec![0, 3]),
        )
        .unwrap_err();
        assert!(matches!(err, ShrinkError::InvalidCategoryCode { code: 3, .. }));
    }
}
