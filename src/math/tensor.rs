use std::cell::RefCell;
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::rc::Rc;

use crate::error::{Error, Result};

/// Number of columns printed on one line before the renderer wraps.
const WRAP_COLUMNS: usize = 8;

/// A 2-D, row-major matrix of `f32` that may be a view into a larger buffer.
///
/// Shape metadata (`rows`, `columns`, `row_stride`, `offset`) is held by
/// value; the element buffer is held by shared reference. A Tensor and every
/// view derived from it through [`Tensor::view`], [`Tensor::view_at`] or
/// [`Tensor::view_row`] read and write the same storage, so a write through
/// one is visible through all of them. [`Tensor::copy`] is the only way to
/// obtain independent storage from an existing Tensor, which is why `Tensor`
/// does not implement `Clone`.
pub struct Tensor {
    rows: usize,
    columns: usize,
    row_stride: usize,
    offset: usize,
    buffer: Rc<RefCell<Vec<f32>>>,
}

impl Tensor {
    /// Allocates a zero-filled `rows x columns` tensor.
    pub fn new(rows: usize, columns: usize) -> Result<Tensor> {
        let len = element_count(rows, columns)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| Error::InvalidShape { rows, columns })?;
        data.resize(len, 0.0);

        Ok(Tensor {
            rows,
            columns,
            row_stride: columns,
            offset: 0,
            buffer: Rc::new(RefCell::new(data)),
        })
    }

    /// Allocates a tensor and fills element `i` (linear order) with
    /// `generator(i, i)`.
    ///
    /// Both arguments are the linear index. Callers can use them to seed
    /// per-element values but must not treat them as a (row, column) pair.
    pub fn from_fn<F>(rows: usize, columns: usize, mut generator: F) -> Result<Tensor>
    where
        F: FnMut(usize, usize) -> f32,
    {
        let tensor = Tensor::new(rows, columns)?;
        {
            let mut data = tensor.buffer.borrow_mut();
            for (i, value) in data.iter_mut().enumerate() {
                *value = generator(i, i);
            }
        }
        Ok(tensor)
    }

    /// Copies `data` into a freshly allocated `rows x columns` tensor.
    pub fn from_slice(rows: usize, columns: usize, data: &[f32]) -> Result<Tensor> {
        let len = element_count(rows, columns)?;
        if len != data.len() {
            return Err(Error::shape_mismatch(
                format!("{len} elements ({rows}x{columns})"),
                format!("{} elements", data.len()),
            ));
        }

        Ok(Tensor {
            rows,
            columns,
            row_stride: columns,
            offset: 0,
            buffer: Rc::new(RefCell::new(data.to_vec())),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Physical distance between the starts of two consecutive logical rows.
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Position of element (0, 0) inside the backing buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of logical elements, `rows * columns`.
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// True when both tensors read and write the same backing buffer.
    pub fn shares_buffer_with(&self, other: &Tensor) -> bool {
        Rc::ptr_eq(&self.buffer, &other.buffer)
    }

    fn position(&self, row: usize, column: usize) -> usize {
        self.offset + row * self.row_stride + column
    }

    fn linear_position(&self, index: usize) -> Result<usize> {
        if index >= self.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(self.position(index / self.columns, index % self.columns))
    }

    fn checked_position(&self, row: usize, column: usize) -> Result<usize> {
        if row >= self.rows {
            return Err(Error::IndexOutOfRange {
                index: row,
                len: self.rows,
            });
        }
        if column >= self.columns {
            return Err(Error::IndexOutOfRange {
                index: column,
                len: self.columns,
            });
        }
        Ok(self.position(row, column))
    }

    /// Buffer positions of every logical element, in linear order.
    fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.rows).flat_map(move |r| {
            let start = self.position(r, 0);
            start..start + self.columns
        })
    }

    /// Reads element `index` in linear (row-major) order.
    pub fn get(&self, index: usize) -> Result<f32> {
        let position = self.linear_position(index)?;
        Ok(self.buffer.borrow()[position])
    }

    /// Writes element `index` in linear (row-major) order.
    pub fn set(&mut self, index: usize, value: f32) -> Result<()> {
        let position = self.linear_position(index)?;
        self.buffer.borrow_mut()[position] = value;
        Ok(())
    }

    /// Reads element (`row`, `column`).
    pub fn at(&self, row: usize, column: usize) -> Result<f32> {
        let position = self.checked_position(row, column)?;
        Ok(self.buffer.borrow()[position])
    }

    /// Writes element (`row`, `column`).
    pub fn set_at(&mut self, row: usize, column: usize, value: f32) -> Result<()> {
        let position = self.checked_position(row, column)?;
        self.buffer.borrow_mut()[position] = value;
        Ok(())
    }

    /// Adds `delta` to element `index` in place and returns the new value.
    pub fn add_at(&mut self, index: usize, delta: f32) -> Result<f32> {
        let position = self.linear_position(index)?;
        let mut data = self.buffer.borrow_mut();
        data[position] += delta;
        Ok(data[position])
    }

    fn alias(&self, rows: usize, columns: usize, offset: usize) -> Tensor {
        Tensor {
            rows,
            columns,
            row_stride: self.row_stride,
            offset,
            buffer: Rc::clone(&self.buffer),
        }
    }

    fn check_region(&self, rows: usize, columns: usize, column_offset: usize) -> Result<()> {
        if rows == 0 || columns == 0 {
            return Err(Error::InvalidShape { rows, columns });
        }
        if rows > self.rows {
            return Err(Error::IndexOutOfRange {
                index: rows - 1,
                len: self.rows,
            });
        }
        match column_offset.checked_add(columns) {
            Some(end) if end <= self.columns => {}
            _ => {
                return Err(Error::IndexOutOfRange {
                    index: column_offset.saturating_add(columns - 1),
                    len: self.columns,
                });
            }
        }
        Ok(())
    }

    /// Aliases the top-left `rows x columns` region of this tensor.
    ///
    /// The view starts at the same offset and keeps this tensor's row
    /// stride, so on a contiguous tensor it reinterprets the leading rows
    /// and columns without copying.
    pub fn view(&self, rows: usize, columns: usize) -> Result<Tensor> {
        self.view_at(rows, columns, 0)
    }

    /// Aliases a `rows x columns` region starting `column_offset` columns in.
    pub fn view_at(&self, rows: usize, columns: usize, column_offset: usize) -> Result<Tensor> {
        self.check_region(rows, columns, column_offset)?;
        Ok(self.alias(rows, columns, self.offset + column_offset))
    }

    /// Aliases a single row as a `1 x columns` tensor.
    pub fn view_row(&self, row: usize) -> Result<Tensor> {
        if row >= self.rows {
            return Err(Error::IndexOutOfRange {
                index: row,
                len: self.rows,
            });
        }
        Ok(self.alias(1, self.columns, self.position(row, 0)))
    }

    /// Logical contents in row-major order.
    pub fn to_vec(&self) -> Vec<f32> {
        let data = self.buffer.borrow();
        self.positions().map(|p| data[p]).collect()
    }

    /// Deep copy of the logical contents into a new contiguous tensor.
    pub fn copy(&self) -> Tensor {
        Tensor {
            rows: self.rows,
            columns: self.columns,
            row_stride: self.columns,
            offset: 0,
            buffer: Rc::new(RefCell::new(self.to_vec())),
        }
    }

    /// Sets every logical element to zero; the rest of a shared buffer is
    /// left untouched.
    pub fn zero(&mut self) {
        self.fill(0.0);
    }

    pub fn fill(&mut self, value: f32) {
        let mut data = self.buffer.borrow_mut();
        for r in 0..self.rows {
            let start = self.position(r, 0);
            data[start..start + self.columns].fill(value);
        }
    }

    /// Overwrites this tensor's logical contents with `source`'s.
    pub fn assign(&mut self, source: &Tensor) -> Result<()> {
        if self.shape() != source.shape() {
            return Err(Error::shape_mismatch(
                format_shape(self.shape()),
                format_shape(source.shape()),
            ));
        }
        let values = source.to_vec();
        let mut data = self.buffer.borrow_mut();
        for (p, v) in self.positions().zip(values) {
            data[p] = v;
        }
        Ok(())
    }

    /// Applies `functor` to every element, producing a new owning tensor.
    pub fn map<F>(&self, functor: F) -> Tensor
    where
        F: Fn(f32) -> f32,
    {
        let data = self.buffer.borrow();
        let values = self.positions().map(|p| functor(data[p])).collect();
        Tensor {
            rows: self.rows,
            columns: self.columns,
            row_stride: self.columns,
            offset: 0,
            buffer: Rc::new(RefCell::new(values)),
        }
    }

    pub fn scale(&self, scalar: f32) -> Tensor {
        self.map(|x| x * scalar)
    }

    pub fn subtract_scalar(&self, scalar: f32) -> Tensor {
        self.map(|x| x - scalar)
    }

    /// Standard matrix product `self * rhs`.
    pub fn matmul(&self, rhs: &Tensor) -> Result<Tensor> {
        if self.columns != rhs.rows {
            return Err(Error::IncompatibleShape {
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        let left = self.buffer.borrow();
        let right = rhs.buffer.borrow();
        let mut values = Vec::with_capacity(self.rows * rhs.columns);

        for i in 0..self.rows {
            for j in 0..rhs.columns {
                let mut sum = 0.0;
                for k in 0..self.columns {
                    sum += left[self.position(i, k)] * right[rhs.position(k, j)];
                }
                values.push(sum);
            }
        }

        Ok(Tensor {
            rows: self.rows,
            columns: rhs.columns,
            row_stride: rhs.columns,
            offset: 0,
            buffer: Rc::new(RefCell::new(values)),
        })
    }

    /// Elementwise sum.
    ///
    /// When `rhs` is a single row with as many columns as `self`, it is
    /// broadcast over every row: `result[i, j] = self[i, j] + rhs[0, j]`.
    /// This is how a layer bias is applied.
    pub fn add(&self, rhs: &Tensor) -> Result<Tensor> {
        let broadcast = rhs.rows == 1 && rhs.columns == self.columns;
        if self.shape() != rhs.shape() && !broadcast {
            return Err(Error::shape_mismatch(
                format!("{} or 1x{}", format_shape(self.shape()), self.columns),
                format_shape(rhs.shape()),
            ));
        }

        let left = self.buffer.borrow();
        let right = rhs.buffer.borrow();
        let mut values = Vec::with_capacity(self.len());

        for i in 0..self.rows {
            let rhs_row = if broadcast { 0 } else { i };
            for j in 0..self.columns {
                values.push(left[self.position(i, j)] + right[rhs.position(rhs_row, j)]);
            }
        }

        Ok(Tensor {
            rows: self.rows,
            columns: self.columns,
            row_stride: self.columns,
            offset: 0,
            buffer: Rc::new(RefCell::new(values)),
        })
    }

    /// Renders the tensor prefixed with `label`, e.g. `Weights(...)`.
    pub fn labelled(&self, label: &str) -> String {
        let mut out = String::new();
        self.render(label, &mut out);
        out
    }

    fn render(&self, label: &str, out: &mut String) {
        let data = self.buffer.borrow();
        out.push_str(label);
        out.push('(');
        if self.rows > 1 {
            out.push('[');
        }
        let padding = label.len() + if self.rows > 1 { 2 } else { 1 };

        for r in 0..self.rows {
            if r > 0 {
                out.push_str(",\n");
                out.push_str(&" ".repeat(padding));
            }
            out.push('[');
            for c in 0..self.columns {
                if c > 0 {
                    out.push(',');
                    if c % WRAP_COLUMNS == 0 {
                        out.push('\n');
                        out.push_str(&" ".repeat(padding + 1));
                    } else {
                        out.push(' ');
                    }
                }
                out.push_str(&data[self.position(r, c)].to_string());
            }
            out.push(']');
        }

        if self.rows > 1 {
            out.push(']');
        }
        out.push(')');
    }
}

/// `rows * columns`, rejecting empty and overflowing shapes.
fn element_count(rows: usize, columns: usize) -> Result<usize> {
    if rows == 0 || columns == 0 {
        return Err(Error::InvalidShape { rows, columns });
    }
    rows.checked_mul(columns).ok_or(Error::InvalidShape { rows, columns })
}

pub(crate) fn format_shape((rows, columns): (usize, usize)) -> String {
    format!("{rows}x{columns}")
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labelled("Tensor"))
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("row_stride", &self.row_stride)
            .field("offset", &self.offset)
            .field("data", &self.to_vec())
            .finish()
    }
}

/// Two tensors are equal when their shapes and logical contents match,
/// regardless of stride, offset or buffer sharing.
impl PartialEq for Tensor {
    fn eq(&self, other: &Tensor) -> bool {
        self.shape() == other.shape() && self.to_vec() == other.to_vec()
    }
}

impl Mul<&Tensor> for &Tensor {
    type Output = Tensor;

    fn mul(self, rhs: &Tensor) -> Tensor {
        match self.matmul(rhs) {
            Ok(tensor) => tensor,
            Err(err) => panic!("{err}"),
        }
    }
}

impl Mul<f32> for &Tensor {
    type Output = Tensor;

    fn mul(self, rhs: f32) -> Tensor {
        self.scale(rhs)
    }
}

impl Add<&Tensor> for &Tensor {
    type Output = Tensor;

    fn add(self, rhs: &Tensor) -> Tensor {
        match Tensor::add(self, rhs) {
            Ok(tensor) => tensor,
            Err(err) => panic!("{err}"),
        }
    }
}

impl Sub<f32> for &Tensor {
    type Output = Tensor;

    fn sub(self, rhs: f32) -> Tensor {
        self.subtract_scalar(rhs)
    }
}
