pub mod workbook;
