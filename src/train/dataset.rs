use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::tensor::Tensor;

/// Paired training inputs and expected outputs, one example per row.
///
/// Built with [`Dataset::split`], both halves are views into the same
/// row-major block, so no example data is copied.
#[derive(Debug)]
pub struct Dataset {
    pub inputs: Tensor,
    pub outputs: Tensor,
}

impl Dataset {
    pub fn new(inputs: Tensor, outputs: Tensor) -> Result<Dataset> {
        if inputs.rows() != outputs.rows() {
            return Err(Error::shape_mismatch(
                format!("{} target rows", inputs.rows()),
                format!("{} rows", outputs.rows()),
            ));
        }
        Ok(Dataset { inputs, outputs })
    }

    /// Splits `block` column-wise: the first `input_columns` columns become
    /// the inputs, the remaining columns the expected outputs.
    pub fn split(block: &Tensor, input_columns: usize) -> Result<Dataset> {
        if input_columns == 0 || input_columns >= block.columns() {
            return Err(Error::shape_mismatch(
                format!("between 1 and {} input columns", block.columns().saturating_sub(1)),
                format!("{input_columns}"),
            ));
        }
        let inputs = block.view(block.rows(), input_columns)?;
        let outputs = block.view_at(block.rows(), block.columns() - input_columns, input_columns)?;
        Ok(Dataset { inputs, outputs })
    }

    /// Copies `data` (row-major, `columns` wide) into one block and splits it.
    pub fn from_rows(data: &[f32], columns: usize, input_columns: usize) -> Result<Dataset> {
        if columns == 0 || data.len() % columns != 0 {
            return Err(Error::shape_mismatch(
                format!("a multiple of {columns} values"),
                format!("{} values", data.len()),
            ));
        }
        let block = Tensor::from_slice(data.len() / columns, columns, data)?;
        Dataset::split(&block, input_columns)
    }

    pub fn len(&self) -> usize {
        self.inputs.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn table(function: BooleanFunction) -> Result<Dataset> {
        let truth = |a: bool, b: bool| -> f32 {
            let out = match function {
                BooleanFunction::And => a && b,
                BooleanFunction::Or => a || b,
                BooleanFunction::Xor => a ^ b,
            };
            if out { 1.0 } else { 0.0 }
        };

        let mut data = Vec::with_capacity(12);
        for (a, b) in [(false, false), (true, false), (false, true), (true, true)] {
            data.extend([a as u8 as f32, b as u8 as f32, truth(a, b)]);
        }

        Dataset::from_rows(&data, 3, 2)
    }

    pub fn xor() -> Result<Dataset> {
        Dataset::table(BooleanFunction::Xor)
    }

    pub fn and() -> Result<Dataset> {
        Dataset::table(BooleanFunction::And)
    }

    pub fn or() -> Result<Dataset> {
        Dataset::table(BooleanFunction::Or)
    }
}

/// Two-input boolean truth tables, rows ordered (0,0), (1,0), (0,1), (1,1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanFunction {
    And,
    Or,
    #[default]
    Xor,
}
