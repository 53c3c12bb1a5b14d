/*!

This is the long-form manual for `share_table` and `mbtishare`.

## Input layouts

Two layouts are understood. The layout is detected from the names of the columns.

### Wide

One row per country, one column per type:

```text
Country,INTJ,INTP,ENTJ,ENTP,INFJ,INFP,ENFJ,ENFP,ISTJ,ISFJ,ESTJ,ESFJ,ISTP,ISFP,ESTP,ESFP
Korea,0.05,0.06,0.04,0.05,0.06,0.09,0.05,0.08,0.07,0.08,0.06,0.07,0.05,0.07,0.04,0.08
```

A table is considered wide when at least 10 of its columns are named after a type (case and
surrounding spaces do not matter). Exports with a few missing type columns are still read
as wide tables.

### Long

One row per country and type:

```text
country,type,percentage
Korea,INFP,9.2
Korea,enfp,8.1
```

The columns are found by name:

| role    | accepted names (in order of priority)                   | if not found                       |
|---------|---------------------------------------------------------|------------------------------------|
| country | `country`, `nation`, `countries`, `국가`, `나라`, `국가명` | the first column                   |
| type    | `type`                                                  | error                              |
| value   | `percentage`, `value`, `ratio`, `share`, `percent`      | the first column with only numbers |

The fallbacks are guesses. The summary written with `--summary` records which columns were
picked and whether they were found by name.

## Units

If all the values of a table are at most 1, they are read as fractions and multiplied by 100.
The decision is made once for the whole table. This can be forced with the `unit` rule
(`auto`, `fraction` or `percentage`).

## Lenient reading

Rows with an unknown type code, a missing or non-numeric value, an empty country or a
percentage outside [0, 100] are dropped without error. The number of dropped rows is reported
in the summary, and the countries whose shares do not add up to 100 (within 0.5) are listed
in the quality report.

Duplicated (country, type) pairs are not merged. Country names are kept as written, including
their case and surrounding spaces: ` Korea ` and `Korea` are two different countries.

## Configuration

`mbtishare` accepts a configuration file in JSON. All the fields are optional.

```json
{
  "source": {
    "provider": "csv",
    "filePath": "countriesMBTI_16types.csv",
    "delimiter": ","
  },
  "rules": {
    "wideColumnThreshold": 10,
    "sumTolerance": 0.5,
    "unit": "auto"
  },
  "outputSettings": {
    "outputPath": "canonical.csv",
    "summaryPath": "summary.json",
    "topType": "INFP",
    "topN": 10
  }
}
```

- `provider`: `csv` or `xlsx`.
- `excelWorksheetName` (xlsx only): the worksheet to read. The first worksheet by default.
- Relative paths are resolved from the directory of the configuration file.
- The command line options take precedence over the configuration file.

## Output

The canonical table is written as CSV:

```text
country,type,percentage
Korea,INFP,9.2
```

 */
